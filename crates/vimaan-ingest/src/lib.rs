//! Spreadsheet ingestion.
//!
//! Decodes CSV files with polars and Excel workbooks with calamine into an
//! immutable [`vimaan_model::TabularStore`]. Decoding either yields a complete
//! store or an [`IngestError`].

#![deny(unsafe_code)]

mod convert;
mod error;
mod excel;
mod reader;

pub use convert::{any_to_cell, store_from_frame};
pub use error::{IngestError, Result};
pub use excel::{data_to_cell, read_excel_store};
pub use reader::{
    DEFAULT_FIRST_ROW_LABEL, IngestOptions, MAX_FILE_SIZE, SpreadsheetFormat, check_file_size,
    read_csv_frame, read_csv_store, read_store, validate_encoding, validate_frame,
};
