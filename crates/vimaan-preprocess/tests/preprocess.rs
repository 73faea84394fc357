use std::collections::HashMap;

use proptest::prelude::{Just, Strategy, prop, prop_assert, prop_assert_eq, prop_oneof, proptest};

use vimaan_map::{FieldMapping, MappingError};
use vimaan_model::{Cell, CellKey, Role, RowLabel, TabularStore};
use vimaan_preprocess::{PreprocessEngine, PreprocessError};

fn columns() -> Vec<String> {
    ["City", "State", "Country", "IATA"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn row(city: Option<&str>, state: &str, country: &str, iata: &str) -> Vec<Cell> {
    vec![
        Cell::from(city),
        Cell::from(state),
        Cell::from(country),
        Cell::from(iata),
    ]
}

fn full_mapping(store: &TabularStore) -> FieldMapping {
    let mut mapping = FieldMapping::for_store(store);
    mapping.assign(Role::City, "City").unwrap();
    mapping.assign(Role::State, "State").unwrap();
    mapping.assign(Role::Country, "Country").unwrap();
    mapping.assign(Role::AirportCode, "IATA").unwrap();
    mapping
}

fn chennai_store() -> TabularStore {
    TabularStore::with_line_numbers(
        columns(),
        vec![
            row(Some("Chennai"), "TN", "India", "MAA"),
            row(None, "TN", "India", "MAA"),
            row(Some("Chennai"), "TN", "India", "MAA"),
        ],
        2,
    )
    .unwrap()
}

#[test]
fn chennai_missing_and_duplicates() {
    let store = chennai_store();
    let mapping = full_mapping(&store);
    let engine = PreprocessEngine::default();

    let missing = engine.missing_rows(&store, &mapping).unwrap();
    assert_eq!(missing.row_labels(), &[RowLabel(3)]);
    assert!(missing.cell_at(0, 0).unwrap().is_absent());

    let duplicates = engine.duplicate_rows(&store, &mapping).unwrap();
    assert_eq!(duplicates.row_labels(), &[RowLabel(2), RowLabel(4)]);
    assert_eq!(duplicates.columns(), store.columns());
    assert_eq!(duplicates.cell_at(1, 0).unwrap(), &Cell::from("Chennai"));

    // source untouched
    assert_eq!(store, chennai_store());
}

#[test]
fn unassigned_role_fails_with_incomplete_mapping() {
    let store = chennai_store();
    let mut mapping = full_mapping(&store);
    mapping.clear(Role::State).unwrap();

    let err = PreprocessEngine::default()
        .duplicate_rows(&store, &mapping)
        .unwrap_err();
    assert!(err.is_incomplete_mapping());
    assert_eq!(
        err,
        PreprocessError::Mapping(MappingError::IncompleteMapping {
            missing: vec![Role::State]
        })
    );
}

#[test]
fn airport_code_is_not_a_key_by_default() {
    let store = TabularStore::with_line_numbers(
        columns(),
        vec![
            row(Some("Pune"), "MH", "India", "PNQ"),
            vec![
                Cell::from("Pune"),
                Cell::from("MH"),
                Cell::from("India"),
                Cell::Absent,
            ],
        ],
        2,
    )
    .unwrap();
    let mapping = full_mapping(&store);

    let default = PreprocessEngine::default();
    assert!(default.missing_rows(&store, &mapping).unwrap().is_empty());
    assert_eq!(default.duplicate_rows(&store, &mapping).unwrap().row_count(), 2);

    let with_airport = PreprocessEngine::new(Role::ALL);
    assert_eq!(
        with_airport.missing_row_indices(&store, &mapping).unwrap(),
        vec![1]
    );
    assert!(with_airport.duplicate_rows(&store, &mapping).unwrap().is_empty());
}

#[test]
fn key_order_does_not_depend_on_column_order() {
    let store = TabularStore::with_line_numbers(
        vec![
            "Country".to_string(),
            "IATA".to_string(),
            "State".to_string(),
            "City".to_string(),
        ],
        vec![
            vec![
                Cell::from("India"),
                Cell::from("BLR"),
                Cell::from("KA"),
                Cell::from("Bengaluru"),
            ],
            vec![
                Cell::from("India"),
                Cell::from("BLR"),
                Cell::from("KA"),
                Cell::from("Bengaluru"),
            ],
        ],
        10,
    )
    .unwrap();
    let mapping = full_mapping(&store);

    let groups = PreprocessEngine::default()
        .duplicate_groups(&store, &mapping)
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].values, vec!["Bengaluru", "KA", "India"]);
    assert_eq!(groups[0].labels, vec![RowLabel(10), RowLabel(11)]);
}

#[test]
fn integer_and_float_keys_stay_distinct() {
    let store = TabularStore::with_line_numbers(
        columns(),
        vec![
            vec![Cell::Integer(1), Cell::from("S"), Cell::from("C"), Cell::Absent],
            vec![Cell::Float(1.0), Cell::from("S"), Cell::from("C"), Cell::Absent],
            vec![Cell::from(""), Cell::from("S"), Cell::from("C"), Cell::Absent],
        ],
        2,
    )
    .unwrap();
    let mapping = full_mapping(&store);
    let duplicates = PreprocessEngine::default()
        .duplicate_rows(&store, &mapping)
        .unwrap();
    assert!(duplicates.is_empty());
}

#[test]
fn summary_counts() {
    let store = chennai_store();
    let mapping = full_mapping(&store);
    let summary = PreprocessEngine::default()
        .summarize(&store, &mapping)
        .unwrap();
    insta::assert_json_snapshot!(summary, @r#"
    {
      "total_rows": 3,
      "missing_rows": 1,
      "duplicate_rows": 2,
      "duplicate_groups": 1
    }
    "#);
}

fn place_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Absent),
        Just(Cell::from("A")),
        Just(Cell::from("B")),
        Just(Cell::Integer(7)),
    ]
}

fn small_store() -> impl Strategy<Value = TabularStore> {
    prop::collection::vec(prop::collection::vec(place_cell(), 4), 0..24).prop_map(|rows| {
        TabularStore::with_line_numbers(columns(), rows, 2).expect("rows are rectangular")
    })
}

proptest! {
    #[test]
    fn missing_rows_are_exact(store in small_store()) {
        let mapping = full_mapping(&store);
        let engine = PreprocessEngine::default();
        let missing = engine.missing_rows(&store, &mapping).unwrap();

        let expected: Vec<RowLabel> = store
            .iter_rows()
            .filter(|(_, cells)| cells[..3].iter().any(Cell::is_absent))
            .map(|(label, _)| label)
            .collect();
        prop_assert_eq!(missing.row_labels(), expected.as_slice());
    }

    #[test]
    fn duplicate_rows_are_closed_under_key(store in small_store()) {
        let mapping = full_mapping(&store);
        let engine = PreprocessEngine::default();
        let duplicates = engine.duplicate_rows(&store, &mapping).unwrap();

        let key = |cells: &[Cell]| -> Vec<CellKey> { cells[..3].iter().map(Cell::key).collect() };
        let mut counts: HashMap<Vec<CellKey>, usize> = HashMap::new();
        for (_, cells) in store.iter_rows() {
            *counts.entry(key(cells)).or_default() += 1;
        }
        let expected: Vec<RowLabel> = store
            .iter_rows()
            .filter(|(_, cells)| counts[&key(cells)] >= 2)
            .map(|(label, _)| label)
            .collect();
        prop_assert_eq!(duplicates.row_labels(), expected.as_slice());

        for (_, cells) in duplicates.iter_rows() {
            prop_assert!(counts[&key(cells)] >= 2);
        }
    }

    #[test]
    fn derivations_are_idempotent(store in small_store()) {
        let mapping = full_mapping(&store);
        let engine = PreprocessEngine::default();
        let first = engine.derive(&store, &mapping).unwrap();
        let second = engine.derive(&store, &mapping).unwrap();
        prop_assert_eq!(&first, &second);

        let summary = engine.summarize(&store, &mapping).unwrap();
        prop_assert_eq!(summary.missing_rows, first.missing.row_count());
        prop_assert_eq!(summary.duplicate_rows, first.duplicates.row_count());
    }
}
