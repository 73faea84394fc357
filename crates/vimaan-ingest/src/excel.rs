//! Excel workbook reading (xlsx, xlsm, xlsb, xls, ods).

use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use vimaan_model::{Cell, TabularStore};

use crate::error::{IngestError, Result};
use crate::reader::{IngestOptions, check_file_size, warn_if_wide};

/// Floats with no fractional part below this magnitude are read as integers.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e15;

/// Map one workbook value onto a [`Cell`].
///
/// Empty cells, empty strings and error cells (`#N/A`, `#DIV/0!`) become
/// [`Cell::Absent`]. Dates are kept as their serial number.
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Absent,
        Data::String(s) if s.is_empty() => Cell::Absent,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Integer(*n),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < INTEGRAL_FLOAT_LIMIT => {
            Cell::Integer(*n as i64)
        }
        Data::Float(n) => Cell::Float(*n),
        Data::Bool(b) => Cell::Boolean(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
    }
}

/// Read the first worksheet of a workbook into a [`TabularStore`].
///
/// The first row of the used range is the header. Data rows are labelled from
/// `options.first_row_label`, blank rows included, so labels keep matching
/// the sheet's line numbers when the range starts at row 1.
pub fn read_excel_store(path: &Path, options: &IngestOptions) -> Result<TabularStore> {
    check_file_size(path, options.max_file_size)?;

    let excel_error = |e: calamine::Error| IngestError::ExcelRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(excel_error)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?;
    let range = workbook.worksheet_range(&sheet).map_err(excel_error)?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| IngestError::EmptyWorksheet {
        path: path.to_path_buf(),
        sheet: sheet.clone(),
    })?;
    let columns: Vec<String> = header
        .iter()
        .map(|data| data_to_cell(data).display().into_owned())
        .collect();
    if columns.iter().any(|name| name.trim().is_empty()) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    warn_if_wide(path, columns.len());

    let data: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();
    let store = TabularStore::with_line_numbers(columns, data, options.first_row_label)?;
    tracing::info!(
        path = %path.display(),
        sheet = %sheet,
        rows = store.row_count(),
        columns = store.column_count(),
        "workbook imported"
    );
    Ok(store)
}
