//! Error types for spatial operations.

/// Errors that can occur during spatial operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// A cell coordinate is outside the grid.
    #[error("cell ({row}, {col}) is out of bounds")]
    OutOfBounds {
        /// Row index.
        row: i64,
        /// Column index.
        col: i64,
    },

    /// The grid dimensions are invalid.
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The number of cell values does not match the grid dimensions.
    #[error("expected {expected} cell values, got {actual}")]
    ValueCountMismatch {
        /// Cells implied by the dimensions.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
}
