//! Shared C header emission for the tablegen tools.
//!
//! Both generators write plain C headers made of `#define` constants and
//! statically initialized array literals. This crate owns that text format
//! so the pitch table and mesh exporters lay their output out identically.

pub mod c_header;
pub mod ident;
pub mod parse;

pub use c_header::{CArray, CHeader, CValue};
pub use ident::{c_identifier, camel_case, upper_snake};
pub use parse::{ParseError, parse_array, parse_define, parse_int_literal};
