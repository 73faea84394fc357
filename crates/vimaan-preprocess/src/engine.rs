//! Missing-field and duplicate-record derivations.
//!
//! Both derivations read a frozen store and return new stores holding a subset
//! of its rows. The source store is never touched, so the two may run in
//! either order, repeatedly, or on another thread.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use vimaan_map::FieldMapping;
use vimaan_model::{CellKey, Role, RowLabel, TabularStore};

use crate::error::{PreprocessError, Result};

/// Rows sharing one key tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    #[serde(skip)]
    pub key: Vec<CellKey>,
    /// Display form of the key values, in key-role order.
    pub values: Vec<String>,
    /// Row positions in the source store, ascending.
    pub rows: Vec<usize>,
    pub labels: Vec<RowLabel>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Counts for the preprocessing dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreprocessSummary {
    pub total_rows: usize,
    pub missing_rows: usize,
    pub duplicate_rows: usize,
    pub duplicate_groups: usize,
}

/// Both derived stores for one (store, mapping) pair, with the duplicate
/// groups they were built from.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    pub missing: TabularStore,
    pub duplicates: TabularStore,
    pub groups: Vec<DuplicateGroup>,
    /// Row count of the source store.
    pub total_rows: usize,
}

impl DerivedViews {
    pub fn summary(&self) -> PreprocessSummary {
        PreprocessSummary {
            total_rows: self.total_rows,
            missing_rows: self.missing.row_count(),
            duplicate_rows: self.duplicates.row_count(),
            duplicate_groups: self.groups.len(),
        }
    }
}

fn group_rows(store: &TabularStore, groups: &[DuplicateGroup]) -> TabularStore {
    let mut rows: Vec<usize> = groups.iter().flat_map(|g| g.rows.iter().copied()).collect();
    rows.sort_unstable();
    store.select_rows(&rows)
}

/// Computes read-only views over a store through a complete field mapping.
///
/// Checks are scoped to the key roles, which default to the place-name roles
/// (city, state, country). Key tuples are built in key-role order, so they do
/// not depend on where the columns sit in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessEngine {
    key_roles: Vec<Role>,
}

impl PreprocessEngine {
    /// Repeated roles collapse to their first occurrence.
    pub fn new(key_roles: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = Vec::new();
        for role in key_roles {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Self { key_roles: roles }
    }

    pub fn key_roles(&self) -> &[Role] {
        &self.key_roles
    }

    /// Positions of rows where at least one key-role cell is absent.
    pub fn missing_row_indices(
        &self,
        store: &TabularStore,
        mapping: &FieldMapping,
    ) -> Result<Vec<usize>> {
        let key_columns = self.key_columns(store, mapping)?;
        let rows = store
            .iter_rows()
            .enumerate()
            .filter(|(_, (_, cells))| key_columns.iter().any(|&col| cells[col].is_absent()))
            .map(|(row, _)| row)
            .collect();
        Ok(rows)
    }

    /// Store of rows with at least one absent key-role value.
    ///
    /// Absent values in other columns do not qualify a row.
    pub fn missing_rows(&self, store: &TabularStore, mapping: &FieldMapping) -> Result<TabularStore> {
        let rows = self.missing_row_indices(store, mapping)?;
        tracing::debug!(
            total = store.row_count(),
            missing = rows.len(),
            "missing-field rows derived"
        );
        Ok(store.select_rows(&rows))
    }

    /// Every key tuple shared by two or more rows, ordered by first occurrence.
    ///
    /// Absent is compared like any other value: rows missing the same fields
    /// group together only when every other key value matches too.
    pub fn duplicate_groups(
        &self,
        store: &TabularStore,
        mapping: &FieldMapping,
    ) -> Result<Vec<DuplicateGroup>> {
        let key_columns = self.key_columns(store, mapping)?;

        let mut slots: HashMap<Vec<CellKey>, usize> = HashMap::new();
        let mut groups: Vec<(Vec<CellKey>, Vec<usize>)> = Vec::new();
        for (row, (_, cells)) in store.iter_rows().enumerate() {
            let key: Vec<CellKey> = key_columns.iter().map(|&col| cells[col].key()).collect();
            match slots.entry(key) {
                Entry::Occupied(slot) => groups[*slot.get()].1.push(row),
                Entry::Vacant(slot) => {
                    groups.push((slot.key().clone(), vec![row]));
                    slot.insert(groups.len() - 1);
                }
            }
        }

        let duplicates = groups
            .into_iter()
            .filter(|(_, rows)| rows.len() >= 2)
            .map(|(key, rows)| {
                let first = rows[0];
                let values = key_columns
                    .iter()
                    .map(|&col| {
                        store
                            .cell_at(first, col)
                            .map(|cell| cell.display().into_owned())
                            .unwrap_or_default()
                    })
                    .collect();
                let labels = rows
                    .iter()
                    .filter_map(|&row| store.row_label(row))
                    .collect();
                DuplicateGroup {
                    key,
                    values,
                    rows,
                    labels,
                }
            })
            .collect();
        Ok(duplicates)
    }

    /// Store of every row whose key tuple occurs at least twice, in source order.
    pub fn duplicate_rows(
        &self,
        store: &TabularStore,
        mapping: &FieldMapping,
    ) -> Result<TabularStore> {
        let groups = self.duplicate_groups(store, mapping)?;
        let duplicates = group_rows(store, &groups);
        tracing::debug!(
            total = store.row_count(),
            duplicates = duplicates.row_count(),
            groups = groups.len(),
            "duplicate rows derived"
        );
        Ok(duplicates)
    }

    /// Compute both derived stores. Key tuples are grouped once and the
    /// groups are kept alongside the duplicate store.
    pub fn derive(&self, store: &TabularStore, mapping: &FieldMapping) -> Result<DerivedViews> {
        let missing = self.missing_rows(store, mapping)?;
        let groups = self.duplicate_groups(store, mapping)?;
        let duplicates = group_rows(store, &groups);
        tracing::debug!(
            total = store.row_count(),
            missing = missing.row_count(),
            duplicates = duplicates.row_count(),
            groups = groups.len(),
            "derived views computed"
        );
        Ok(DerivedViews {
            missing,
            duplicates,
            groups,
            total_rows: store.row_count(),
        })
    }

    pub fn summarize(
        &self,
        store: &TabularStore,
        mapping: &FieldMapping,
    ) -> Result<PreprocessSummary> {
        let missing = self.missing_row_indices(store, mapping)?;
        let groups = self.duplicate_groups(store, mapping)?;
        Ok(PreprocessSummary {
            total_rows: store.row_count(),
            missing_rows: missing.len(),
            duplicate_rows: groups.iter().map(DuplicateGroup::len).sum(),
            duplicate_groups: groups.len(),
        })
    }

    fn key_columns(&self, store: &TabularStore, mapping: &FieldMapping) -> Result<Vec<usize>> {
        let resolved = mapping.resolve(store)?;
        if self.key_roles.is_empty() {
            return Err(PreprocessError::NoKeyRoles);
        }
        self.key_roles
            .iter()
            .map(|&role| {
                resolved
                    .index_of(role)
                    .ok_or(PreprocessError::RoleNotMapped { role })
            })
            .collect()
    }
}

impl Default for PreprocessEngine {
    fn default() -> Self {
        Self::new(Role::INPUTS)
    }
}

#[cfg(test)]
mod tests {
    use vimaan_model::Cell;

    use super::*;

    fn store() -> TabularStore {
        TabularStore::with_line_numbers(
            vec!["City".to_string(), "State".to_string(), "Notes".to_string()],
            vec![
                vec![Cell::from("Pune"), Cell::from("MH"), Cell::Absent],
                vec![Cell::Absent, Cell::from("MH"), Cell::from("x")],
                vec![Cell::Absent, Cell::from("MH"), Cell::Absent],
                vec![Cell::from("Pune"), Cell::from("MH"), Cell::from("y")],
            ],
            2,
        )
        .unwrap()
    }

    fn mapping(store: &TabularStore) -> FieldMapping {
        let mut mapping = FieldMapping::with_roles([Role::City, Role::State], store);
        mapping.assign(Role::City, "City").unwrap();
        mapping.assign(Role::State, "State").unwrap();
        mapping
    }

    #[test]
    fn missing_ignores_unmapped_columns() {
        let store = store();
        let engine = PreprocessEngine::new([Role::City, Role::State]);
        let rows = engine.missing_row_indices(&store, &mapping(&store)).unwrap();
        assert_eq!(rows, vec![1, 2]);
    }

    #[test]
    fn matching_absences_group_together() {
        let store = store();
        let engine = PreprocessEngine::new([Role::City, Role::State]);
        let groups = engine.duplicate_groups(&store, &mapping(&store)).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].rows, vec![0, 3]);
        assert_eq!(groups[0].values, vec!["Pune".to_string(), "MH".to_string()]);
        assert_eq!(groups[1].rows, vec![1, 2]);
        assert_eq!(groups[1].labels, vec![RowLabel(3), RowLabel(4)]);
    }

    #[test]
    fn key_role_outside_mapping_is_rejected() {
        let store = store();
        let engine = PreprocessEngine::default();
        assert_eq!(
            engine.missing_rows(&store, &mapping(&store)),
            Err(PreprocessError::RoleNotMapped {
                role: Role::Country
            })
        );
    }

    #[test]
    fn empty_key_roles_are_rejected() {
        let store = store();
        let engine = PreprocessEngine::new([]);
        assert_eq!(
            engine.duplicate_rows(&store, &mapping(&store)),
            Err(PreprocessError::NoKeyRoles)
        );
    }

    #[test]
    fn derived_views_summary_matches_summarize() {
        let store = store();
        let mapping = mapping(&store);
        let engine = PreprocessEngine::new([Role::City, Role::State]);
        let views = engine.derive(&store, &mapping).unwrap();
        assert_eq!(views.groups.len(), 2);
        assert_eq!(views.duplicates.row_count(), 4);
        assert_eq!(views.summary(), engine.summarize(&store, &mapping).unwrap());
    }
}
