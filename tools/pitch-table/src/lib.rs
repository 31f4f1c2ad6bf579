//! pitch-table library
//!
//! Computes the fixed-size bit-position table and serializes it as a C
//! header. Row `r` of the table has exactly `r` bits set, placed by
//! repeatedly halving the column range so marks stay evenly spread.

pub mod error;
pub mod generator;
pub mod header;

pub use error::TableError;
pub use generator::{
    compute_row_bitmask, generate, placement_order, resolve_bit_position, PitchTable,
    TableDimensions, DEFAULT_COLS, DEFAULT_ROWS,
};
pub use header::{parse_table, render_table, write_table, TableStyle};
