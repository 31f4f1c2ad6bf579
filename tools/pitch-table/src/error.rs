//! Error types for table generation

/// Pitch table error
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Rows/columns outside the range the placement rule supports
    #[error("invalid table dimensions {rows}x{cols}: {reason}")]
    InvalidDimensions {
        rows: u32,
        cols: u32,
        reason: &'static str,
    },

    /// Placement requested past the last column
    #[error("bit placement {index} is out of range for {cols} columns")]
    OutOfRange { index: u32, cols: u32 },

    /// Header text does not describe a pitch table
    #[error("malformed pitch table header: {0}")]
    Malformed(String),

    #[error(transparent)]
    Parse(#[from] tablegen_shared::ParseError),

    #[error("failed to format header")]
    Format(#[from] std::fmt::Error),
}
