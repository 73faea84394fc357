//! Error types for spreadsheet ingestion.

use std::path::PathBuf;

use thiserror::Error;
use vimaan_model::TableError;

/// Errors raised while decoding a spreadsheet into a store.
///
/// No variant ever comes with a partially built store.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("spreadsheet not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    #[error("unsupported encoding {encoding} in {path}; save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Decoding Errors ===
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("failed to read workbook {path}: {message}")]
    ExcelRead { path: PathBuf, message: String },

    #[error("workbook {path} has no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error("worksheet '{sheet}' in {path} has no header row")]
    EmptyWorksheet { path: PathBuf, sheet: String },

    #[error("empty column name in {path}")]
    EmptyColumnName { path: PathBuf },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// The decoded cells do not form a valid store.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/airports.csv"),
        };
        assert_eq!(err.to_string(), "spreadsheet not found: /data/airports.csv");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("City".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }

    #[test]
    fn test_error_from_table() {
        let err: IngestError = TableError::DuplicateColumn {
            name: "City".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "malformed table: duplicate column name 'City'");
    }
}
