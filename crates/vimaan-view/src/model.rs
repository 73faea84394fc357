//! Virtual table model with an atomic reset protocol.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use vimaan_model::TabularStore;

use crate::error::{Result, ViewError};
use crate::paging::{Window, materialize};
use crate::source::TableSource;

/// Notification sent around every [`VirtualTableModel::bind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// Drop every cached count and layout; the store is about to change.
    AboutToReset { generation: u64 },
    /// The new store is visible. Counts may be re-queried.
    ResetDone {
        generation: u64,
        rows: usize,
        columns: usize,
    },
}

/// Consumer of reset notifications.
pub trait ModelListener: Send {
    fn on_model_event(&mut self, event: &ModelEvent);
}

impl ModelListener for Sender<ModelEvent> {
    fn on_model_event(&mut self, event: &ModelEvent) {
        // A dropped receiver just means nobody is watching any more.
        let _ = self.send(event.clone());
    }
}

/// Cell position tied to the binding it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub generation: u64,
    pub row: usize,
    pub column: usize,
}

/// Exposes a [`TabularStore`] to a renderer without materialising display
/// strings for the whole table.
///
/// The store is shared, never copied or mutated. [`bind`](Self::bind) swaps
/// it in one step between an `AboutToReset` and a `ResetDone` notification,
/// so counts and cell accessors always agree on which store backs them.
pub struct VirtualTableModel {
    store: Arc<TabularStore>,
    generation: u64,
    listeners: Vec<Box<dyn ModelListener>>,
}

impl VirtualTableModel {
    pub fn new(store: Arc<TabularStore>) -> Self {
        Self {
            store,
            generation: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl ModelListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the backing store.
    pub fn bind(&mut self, store: Arc<TabularStore>) {
        let next = self.generation + 1;
        self.notify(&ModelEvent::AboutToReset { generation: next });
        self.store = store;
        self.generation = next;
        tracing::debug!(
            generation = next,
            rows = self.store.row_count(),
            columns = self.store.column_count(),
            "table model rebound"
        );
        self.notify(&ModelEvent::ResetDone {
            generation: next,
            rows: self.store.row_count(),
            columns: self.store.column_count(),
        });
    }

    pub fn store(&self) -> &Arc<TabularStore> {
        &self.store
    }

    /// Incremented by every bind.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mint a [`CellIndex`] valid for the current binding only.
    pub fn index(&self, row: usize, column: usize) -> Result<CellIndex> {
        self.check_bounds(row, column)?;
        Ok(CellIndex {
            generation: self.generation,
            row,
            column,
        })
    }

    pub fn display_at(&self, index: CellIndex) -> Result<Cow<'_, str>> {
        if index.generation != self.generation {
            return Err(ViewError::StaleIndex {
                index_generation: index.generation,
                current: self.generation,
            });
        }
        self.display_value(index.row, index.column)
    }

    /// Display strings for `rows` only, clamped to the row count.
    pub fn window(&self, rows: Range<usize>) -> Result<Window> {
        materialize(self, rows)
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<()> {
        self.check_row(row)?;
        self.check_column(column)
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.store.row_count() {
            return Err(ViewError::RowOutOfRange {
                row,
                rows: self.store.row_count(),
            });
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.store.column_count() {
            return Err(ViewError::ColumnOutOfRange {
                column,
                columns: self.store.column_count(),
            });
        }
        Ok(())
    }

    fn notify(&mut self, event: &ModelEvent) {
        for listener in &mut self.listeners {
            listener.on_model_event(event);
        }
    }
}

impl TableSource for VirtualTableModel {
    fn row_count(&self) -> usize {
        self.store.row_count()
    }

    fn column_count(&self) -> usize {
        self.store.column_count()
    }

    fn display_value(&self, row: usize, column: usize) -> Result<Cow<'_, str>> {
        self.check_bounds(row, column)?;
        let cell = self
            .store
            .cell_at(row, column)
            .map_err(|_| ViewError::RowOutOfRange {
                row,
                rows: self.store.row_count(),
            })?;
        Ok(cell.display())
    }

    fn row_header(&self, row: usize) -> Result<String> {
        self.check_row(row)?;
        self.store
            .row_label(row)
            .map(|label| label.to_string())
            .ok_or(ViewError::RowOutOfRange {
                row,
                rows: self.store.row_count(),
            })
    }

    fn column_header(&self, column: usize) -> Result<&str> {
        self.store
            .column_name(column)
            .ok_or(ViewError::ColumnOutOfRange {
                column,
                columns: self.store.column_count(),
            })
    }
}

impl Default for VirtualTableModel {
    fn default() -> Self {
        Self::new(Arc::new(TabularStore::empty()))
    }
}

impl fmt::Debug for VirtualTableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualTableModel")
            .field("generation", &self.generation)
            .field("rows", &self.store.row_count())
            .field("columns", &self.store.column_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use vimaan_model::Cell;

    use super::*;

    fn store(rows: usize, first_label: u64) -> Arc<TabularStore> {
        let data = (0..rows)
            .map(|i| vec![Cell::Integer(i as i64), Cell::Absent])
            .collect();
        let columns = vec!["N".to_string(), "Gap".to_string()];
        Arc::new(TabularStore::with_line_numbers(columns, data, first_label).unwrap())
    }

    #[test]
    fn bind_brackets_the_swap_with_notifications() {
        let (tx, rx) = mpsc::channel();
        let mut model = VirtualTableModel::default();
        model.subscribe(tx);

        model.bind(store(3, 2));

        let events: Vec<ModelEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ModelEvent::AboutToReset { generation: 1 },
                ModelEvent::ResetDone {
                    generation: 1,
                    rows: 3,
                    columns: 2
                },
            ]
        );
    }

    #[test]
    fn absent_renders_empty_and_headers_use_labels() {
        let model = VirtualTableModel::new(store(2, 10));
        assert_eq!(model.display_value(1, 0).unwrap(), "1");
        assert_eq!(model.display_value(1, 1).unwrap(), "");
        assert_eq!(model.row_header(1).unwrap(), "11");
        assert_eq!(model.column_header(1).unwrap(), "Gap");
    }

    #[test]
    fn stale_index_is_rejected_after_bind() {
        let mut model = VirtualTableModel::new(store(5, 2));
        let index = model.index(4, 0).unwrap();
        model.bind(store(5, 2));
        assert_eq!(
            model.display_at(index),
            Err(ViewError::StaleIndex {
                index_generation: 0,
                current: 1
            })
        );
    }
}
