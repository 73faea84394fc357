use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tempfile::NamedTempFile;

use vimaan_ingest::{IngestError, IngestOptions, read_csv_store, read_excel_store, read_store};
use vimaan_model::{Cell, RowLabel};

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn reads_rows_with_spreadsheet_line_labels() {
    let file = create_temp_csv(
        "City,State,Country,IATA\nChennai,TN,India,MAA\n,TN,India,MAA\nChennai,TN,India,MAA\n",
    );
    let store = read_csv_store(file.path(), &IngestOptions::default()).unwrap();

    assert_eq!(store.columns(), &["City", "State", "Country", "IATA"]);
    assert_eq!(store.row_count(), 3);
    assert_eq!(store.row_labels(), &[RowLabel(2), RowLabel(3), RowLabel(4)]);
    assert!(store.cell_at(1, 0).unwrap().is_absent());
    assert_eq!(store.cell_at(2, 3).unwrap(), &Cell::from("MAA"));
}

#[test]
fn keeps_numeric_kinds() {
    let file = create_temp_csv("City,Elevation,Lat\nPune,560,18.58\nLeh,3256,34.13\n");
    let options = IngestOptions {
        first_row_label: 1,
        ..IngestOptions::default()
    };
    let store = read_csv_store(file.path(), &options).unwrap();

    assert_eq!(store.row_labels()[0], RowLabel(1));
    assert_eq!(store.cell_at(0, 1).unwrap(), &Cell::Integer(560));
    assert_eq!(store.cell_at(1, 2).unwrap(), &Cell::Float(34.13));
}

#[test]
fn header_only_file_yields_empty_store() {
    let file = create_temp_csv("City,State\n");
    let store = read_csv_store(file.path(), &IngestOptions::default()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.column_count(), 2);
}

#[test]
fn missing_file_is_reported() {
    let err = read_csv_store(
        Path::new("/nonexistent/airports.csv"),
        &IngestOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn oversized_file_is_rejected_before_decoding() {
    let file = create_temp_csv("City\nChennai\nPune\n");
    let options = IngestOptions {
        max_file_size: 8,
        ..IngestOptions::default()
    };
    let err = read_csv_store(file.path(), &options).unwrap_err();
    assert!(matches!(err, IngestError::FileTooLarge { .. }));
}

#[test]
fn column_turning_to_text_after_many_rows_is_read() {
    let mut content = String::from("City,State\n");
    for i in 0..150 {
        writeln!(content, "{i},TN").unwrap();
    }
    content.push_str("Chennai,TN\n");
    let file = create_temp_csv(&content);

    let store = read_csv_store(file.path(), &IngestOptions::default()).unwrap();
    assert_eq!(store.row_count(), 151);
    assert_eq!(store.cell_at(150, 0).unwrap(), &Cell::from("Chennai"));
    assert_eq!(store.cell_at(0, 0).unwrap().display(), "0");
    assert_eq!(store.row_labels()[150], RowLabel(152));
}

fn create_temp_workbook() -> NamedTempFile {
    let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in ["City", "State", "Country", "IATA", "Elevation"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    sheet.write_string(1, 0, "Chennai").unwrap();
    sheet.write_string(1, 1, "TN").unwrap();
    sheet.write_string(1, 2, "India").unwrap();
    sheet.write_string(1, 3, "MAA").unwrap();
    sheet.write_number(1, 4, 16.0).unwrap();
    // Row 3 has no city.
    sheet.write_string(2, 1, "TN").unwrap();
    sheet.write_string(2, 2, "India").unwrap();
    sheet.write_string(2, 3, "MAA").unwrap();
    sheet.write_number(2, 4, 6.5).unwrap();
    workbook.save(file.path()).unwrap();
    file
}

#[test]
fn reads_first_worksheet_of_workbook() {
    let file = create_temp_workbook();
    let store = read_excel_store(file.path(), &IngestOptions::default()).unwrap();

    assert_eq!(
        store.columns(),
        &["City", "State", "Country", "IATA", "Elevation"]
    );
    assert_eq!(store.row_labels(), &[RowLabel(2), RowLabel(3)]);
    assert_eq!(store.cell_at(0, 0).unwrap(), &Cell::from("Chennai"));
    assert_eq!(store.cell_at(0, 4).unwrap(), &Cell::Integer(16));
    assert!(store.cell_at(1, 0).unwrap().is_absent());
    assert_eq!(store.cell_at(1, 4).unwrap(), &Cell::Float(6.5));
}

#[test]
fn read_store_dispatches_on_extension() {
    let workbook = create_temp_workbook();
    let store = read_store(workbook.path(), &IngestOptions::default()).unwrap();
    assert_eq!(store.row_count(), 2);

    let csv = create_temp_csv("City,State\nPune,MH\n");
    let store = read_store(csv.path(), &IngestOptions::default()).unwrap();
    assert_eq!(store.columns(), &["City", "State"]);
}

#[test]
fn missing_workbook_is_reported() {
    let err = read_store(
        Path::new("/nonexistent/airports.xlsx"),
        &IngestOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn corrupt_workbook_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    write!(file, "City,State\nPune,MH\n").unwrap();
    let err = read_store(file.path(), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::ExcelRead { .. }));
}
