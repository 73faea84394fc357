use std::io::Write;
use std::sync::mpsc;

use tempfile::NamedTempFile;

use vimaan_core::{PreprocessUpdate, Session, SessionError, Settings};
use vimaan_map::Assignment;
use vimaan_model::{Cell, Role, RowLabel, TabularStore};
use vimaan_view::TableSource;

fn airports() -> TabularStore {
    TabularStore::with_line_numbers(
        vec![
            "City".to_string(),
            "State".to_string(),
            "Country".to_string(),
            "IATA".to_string(),
        ],
        vec![
            vec![
                Cell::from("Chennai"),
                Cell::from("TN"),
                Cell::from("India"),
                Cell::from("MAA"),
            ],
            vec![
                Cell::Absent,
                Cell::from("TN"),
                Cell::from("India"),
                Cell::from("MAA"),
            ],
            vec![
                Cell::from("Chennai"),
                Cell::from("TN"),
                Cell::from("India"),
                Cell::from("MAA"),
            ],
        ],
        2,
    )
    .unwrap()
}

fn people() -> TabularStore {
    TabularStore::with_line_numbers(
        vec!["Name".to_string(), "Email".to_string()],
        vec![vec![Cell::from("Asha"), Cell::from("asha@example.com")]],
        2,
    )
    .unwrap()
}

#[test]
fn import_suggests_a_complete_mapping() {
    let mut session = Session::default();
    let filled = session.import(airports());

    assert_eq!(filled, Role::ALL.to_vec());
    assert!(session.is_complete());
    assert_eq!(session.model().row_count(), 3);
    assert_eq!(session.model().column_count(), 4);
}

#[test]
fn reimport_discards_previous_mapping() {
    let mut session = Session::default();
    session.import(airports());
    assert!(session.is_complete());

    let filled = session.import(people());
    assert!(filled.is_empty());
    assert!(!session.is_complete());
    assert_eq!(session.mapping().columns(), &["Name", "Email"]);
    assert_eq!(session.mapping().column_for(Role::City), None);

    let err = session.preprocess().unwrap_err();
    assert!(err.is_incomplete_mapping());
}

#[test]
fn manual_mapping_without_auto_suggest() {
    let settings = Settings::from_toml_str("[mapping]\nauto_suggest = false\n").unwrap();
    let mut session = Session::new(&settings);
    assert!(session.import(airports()).is_empty());
    assert!(!session.is_complete());

    for (role, column) in [
        (Role::City, "City"),
        (Role::State, "State"),
        (Role::Country, "Country"),
        (Role::AirportCode, "IATA"),
    ] {
        session.set_role(role, Assignment::column(column)).unwrap();
    }
    assert!(session.is_complete());

    let err = session
        .set_role(Role::City, Assignment::column("Town"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Mapping(_)));
    assert_eq!(session.mapping().column_for(Role::City), Some("City"));
}

#[test]
fn preprocess_derives_both_views() {
    let mut session = Session::default();
    session.import(airports());

    let views = session.preprocess().unwrap();
    assert_eq!(views.missing.row_labels(), &[RowLabel(3)]);
    assert_eq!(views.duplicates.row_labels(), &[RowLabel(2), RowLabel(4)]);
    assert_eq!(session.store().row_count(), 3);

    let summary = session.summarize().unwrap();
    assert_eq!(summary.duplicate_groups, 1);
}

#[test]
fn background_run_binds_secondary_models() {
    let mut session = Session::default();
    session.import(airports());

    let (tx, rx) = mpsc::channel();
    let handle = session.spawn_preprocess(tx);
    let update = rx.recv().unwrap();
    handle.join().unwrap();

    assert!(matches!(update, PreprocessUpdate::Complete { .. }));
    assert!(session.apply_update(update).unwrap());
    assert_eq!(session.derived().missing.row_count(), 1);
    assert_eq!(session.derived().duplicates.row_count(), 2);
    assert_eq!(session.derived().duplicates.row_header(1).unwrap(), "4");
    assert_eq!(session.derived().groups.len(), 1);
    assert_eq!(session.derived().groups[0].labels, vec![RowLabel(2), RowLabel(4)]);
    assert_eq!(
        session.derived().summary,
        Some(session.summarize().unwrap())
    );
}

#[test]
fn mapping_change_discards_running_result() {
    let mut session = Session::default();
    session.import(airports());
    let revision = session.mapping_revision();

    let (tx, rx) = mpsc::channel();
    session.spawn_preprocess(tx).join().unwrap();
    session.set_role(Role::State, Assignment::Unassigned).unwrap();
    assert_eq!(session.mapping_revision(), revision + 1);
    assert!(!session.is_complete());

    let update = rx.recv().unwrap();
    assert!(matches!(update, PreprocessUpdate::Complete { .. }));
    assert!(!session.apply_update(update).unwrap());
    assert_eq!(session.derived().missing.row_count(), 0);
    assert_eq!(session.derived().duplicates.row_count(), 0);
    assert_eq!(session.derived().summary, None);
}

#[test]
fn mapping_change_resets_bound_views() {
    let mut session = Session::default();
    session.import(airports());

    let (tx, rx) = mpsc::channel();
    session.spawn_preprocess(tx).join().unwrap();
    assert!(session.apply_update(rx.recv().unwrap()).unwrap());
    assert_eq!(session.derived().duplicates.row_count(), 2);

    let revision = session.mapping_revision();
    assert!(
        session
            .set_role(Role::City, Assignment::column("Town"))
            .is_err()
    );
    assert_eq!(session.mapping_revision(), revision);
    assert_eq!(session.derived().duplicates.row_count(), 2);

    session
        .set_role(Role::City, Assignment::column("City"))
        .unwrap();
    assert_eq!(session.derived().duplicates.row_count(), 0);
    assert!(session.derived().groups.is_empty());
}

#[test]
fn mapping_summary_counts_assigned_roles() {
    let settings = Settings::from_toml_str("[mapping]\nauto_suggest = false\n").unwrap();
    let mut session = Session::new(&settings);
    session.import(airports());
    session
        .set_role(Role::City, Assignment::column("City"))
        .unwrap();

    let summary = session.mapping_summary();
    assert_eq!(summary.required, 4);
    assert_eq!(summary.assigned, 1);
}

#[test]
fn stale_background_result_is_discarded() {
    let mut session = Session::default();
    session.import(airports());

    let (tx, rx) = mpsc::channel();
    session.spawn_preprocess(tx).join().unwrap();
    session.import(people());

    let update = rx.recv().unwrap();
    assert!(!session.apply_update(update).unwrap());
    assert_eq!(session.derived().missing.row_count(), 0);
}

#[test]
fn failed_background_run_reports_error() {
    let mut session = Session::default();
    session.import(people());

    let (tx, rx) = mpsc::channel();
    session.spawn_preprocess(tx).join().unwrap();
    let update = rx.recv().unwrap();
    assert!(matches!(update, PreprocessUpdate::Failed { .. }));

    let err = session.apply_update(update).unwrap_err();
    assert!(err.is_incomplete_mapping());
}

#[test]
fn clear_binds_empty_store() {
    let mut session = Session::default();
    session.import(airports());
    let generation = session.model().generation();

    session.clear();
    assert_eq!(session.model().row_count(), 0);
    assert_eq!(session.model().generation(), generation + 1);
    assert!(!session.is_complete());
}

#[test]
fn import_file_uses_configured_first_label() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "City,State,Country,IATA\nPune,MH,India,PNQ\n").unwrap();

    let settings = Settings::from_toml_str("[import]\nfirst_row_label = 10\n").unwrap();
    let mut session = Session::new(&settings);
    session.import_file(file.path()).unwrap();

    assert_eq!(session.store().row_labels(), &[RowLabel(10)]);
    assert_eq!(session.model().row_header(0).unwrap(), "10");
}

#[test]
fn failed_csv_import_keeps_current_store() {
    let mut session = Session::default();
    session.import(airports());

    let err = session
        .import_file(std::path::Path::new("/nonexistent/airports.xlsx"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Ingest(_)));
    assert_eq!(session.store().row_count(), 3);
    assert!(session.is_complete());
}
