//! Spreadsheet file reading with pre-flight checks.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use vimaan_model::TabularStore;

use crate::convert::store_from_frame;
use crate::excel::read_excel_store;
use crate::error::{IngestError, Result};

/// Maximum spreadsheet file size (500 MB default).
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Label of the first data row; the header occupies line 1.
pub const DEFAULT_FIRST_ROW_LABEL: u64 = 2;

/// Tables wider than this are logged as a performance risk.
const WIDE_TABLE_COLUMNS: usize = 500;

/// Options for [`read_store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    pub first_row_label: u64,
    pub max_file_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            first_row_label: DEFAULT_FIRST_ROW_LABEL,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

fn open_error(path: &Path, e: io::Error) -> IngestError {
    if e.kind() == io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Check file size against a limit before loading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reject UTF-16 input. A UTF-8 BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }

    Ok(())
}

pub(crate) fn warn_if_wide(path: &Path, columns: usize) {
    if columns > WIDE_TABLE_COLUMNS {
        tracing::warn!(
            path = %path.display(),
            columns,
            "spreadsheet has more than {WIDE_TABLE_COLUMNS} columns"
        );
    }
}

/// Validate the decoded frame's header.
pub fn validate_frame(df: &DataFrame, path: &Path) -> Result<()> {
    warn_if_wide(path, df.width());

    if df
        .get_column_names()
        .iter()
        .any(|name| name.trim().is_empty())
    {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Decode a CSV file into a polars frame.
///
/// Column types are inferred over the whole file, so a column that turns
/// from numbers to text late in the file is read as text.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let parse_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}

/// Read a CSV spreadsheet into a [`TabularStore`].
///
/// The first line is the header. Data rows are labelled from
/// `options.first_row_label` so labels match spreadsheet line numbers.
pub fn read_csv_store(path: &Path, options: &IngestOptions) -> Result<TabularStore> {
    check_file_size(path, options.max_file_size)?;
    validate_encoding(path)?;

    let df = read_csv_frame(path)?;
    validate_frame(&df, path)?;

    let store = store_from_frame(&df, options.first_row_label)?;
    tracing::info!(
        path = %path.display(),
        rows = store.row_count(),
        columns = store.column_count(),
        "spreadsheet imported"
    );
    Ok(store)
}

/// On-disk spreadsheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Excel,
}

impl SpreadsheetFormat {
    /// Pick the format from the file extension. Anything that is not a
    /// workbook extension is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Self::Excel,
            _ => Self::Csv,
        }
    }
}

/// Read a CSV file or the first sheet of a workbook, by file extension.
pub fn read_store(path: &Path, options: &IngestOptions) -> Result<TabularStore> {
    match SpreadsheetFormat::from_path(path) {
        SpreadsheetFormat::Csv => read_csv_store(path, options),
        SpreadsheetFormat::Excel => read_excel_store(path, options),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_utf16_is_rejected() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'A', 0]);
        assert!(matches!(
            validate_encoding(file.path()),
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_size_limit() {
        let file = create_temp_csv(b"City\nChennai\n");
        assert!(check_file_size(file.path(), 1024).is_ok());
        assert!(matches!(
            check_file_size(file.path(), 4),
            Err(IngestError::FileTooLarge { max_size: 4, .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("airports.XLSX")),
            SpreadsheetFormat::Excel
        );
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("airports.xls")),
            SpreadsheetFormat::Excel
        );
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("airports.csv")),
            SpreadsheetFormat::Csv
        );
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("airports")),
            SpreadsheetFormat::Csv
        );
    }

    #[test]
    fn test_default_options() {
        let options = IngestOptions::default();
        assert_eq!(options.first_row_label, 2);
        assert_eq!(options.max_file_size, MAX_FILE_SIZE);
    }
}
