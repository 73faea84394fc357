//! Error types for view access.

use thiserror::Error;

/// Errors from display access through a table view.
///
/// Any of these indicates a caller bug; no value is ever returned for an
/// index that is not valid under the current binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("column {column} out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// A [`crate::CellIndex`] minted before the latest bind.
    #[error("stale index from generation {index_generation} (current generation {current})")]
    StaleIndex {
        index_generation: u64,
        current: u64,
    },
}

pub type Result<T> = std::result::Result<T, ViewError>;
