//! Error types for table construction and access.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    // === Malformed tables ===
    /// Two columns share a name.
    #[error("malformed table: duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// A row's cell count disagrees with the column count.
    #[error("malformed table: row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Row labels and rows differ in length.
    #[error("malformed table: {labels} row labels for {rows} rows")]
    LabelCount { labels: usize, rows: usize },

    // === Access ===
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    #[error("cell ({row}, {column}) out of range for a {rows}x{columns} table")]
    IndexOutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
}

impl TableError {
    /// True for structural violations raised during construction.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::DuplicateColumn { .. } | Self::RowWidth { .. } | Self::LabelCount { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
