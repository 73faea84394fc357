//! Immutable row/column table of imported cells.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{Result, TableError};

/// Externally meaningful row identifier, usually the source spreadsheet line.
///
/// Labels survive filtering: a derived store keeps the labels of the rows it
/// was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowLabel(pub u64);

impl RowLabel {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RowLabel {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A rectangular table of [`Cell`]s with named columns and labelled rows.
///
/// A store never changes after construction. Loading new data means building
/// a new store and rebinding whichever views display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularStore {
    columns: Vec<String>,
    row_labels: Vec<RowLabel>,
    rows: Vec<Vec<Cell>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TabularStore {
    /// Build a store, rejecting duplicate column names, ragged rows and a
    /// label count that differs from the row count.
    pub fn new(
        columns: Vec<String>,
        row_labels: Vec<RowLabel>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(TableError::DuplicateColumn { name: name.clone() });
            }
        }
        if row_labels.len() != rows.len() {
            return Err(TableError::LabelCount {
                labels: row_labels.len(),
                rows: rows.len(),
            });
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(TableError::RowWidth {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self {
            columns,
            row_labels,
            rows,
            index,
        })
    }

    /// Build a store whose rows are labelled `first_label`, `first_label + 1`, ...
    pub fn with_line_numbers(
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
        first_label: u64,
    ) -> Result<Self> {
        let labels = (first_label..).take(rows.len()).map(RowLabel).collect();
        Self::new(columns, labels, rows)
    }

    /// A store with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            row_labels: Vec::new(),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TableError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    pub fn row_labels(&self) -> &[RowLabel] {
        &self.row_labels
    }

    pub fn row_label(&self, row: usize) -> Option<RowLabel> {
        self.row_labels.get(row).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterate `(label, cells)` pairs in row order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (RowLabel, &[Cell])> + '_ {
        self.row_labels
            .iter()
            .copied()
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Result<&Cell> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .ok_or(TableError::IndexOutOfRange {
                row,
                column,
                rows: self.row_count(),
                columns: self.column_count(),
            })
    }

    /// Build a derived store from the given row positions, in the order given.
    ///
    /// Columns are carried over unchanged and each row keeps its label.
    /// Positions past the end are skipped.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut row_labels = Vec::with_capacity(rows.len());
        let mut selected = Vec::with_capacity(rows.len());
        for &row in rows {
            if let (Some(label), Some(cells)) = (self.row_labels.get(row), self.rows.get(row)) {
                row_labels.push(*label);
                selected.push(cells.clone());
            }
        }
        Self {
            columns: self.columns.clone(),
            row_labels,
            rows: selected,
            index: self.index.clone(),
        }
    }
}

impl Default for TabularStore {
    fn default() -> Self {
        Self::empty()
    }
}
