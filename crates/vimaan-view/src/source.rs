//! The view-adapter interface a rendering layer draws from.

use std::borrow::Cow;

use crate::error::Result;

/// Row/column counts, per-cell display strings and header text.
///
/// Implementors own no rendering logic. A terminal table, web grid or native
/// widget queries counts first and then asks only for the cells it shows.
pub trait TableSource {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Display string for one cell; absent cells render as `""`.
    fn display_value(&self, row: usize, column: usize) -> Result<Cow<'_, str>>;

    /// Row header text (the row label).
    fn row_header(&self, row: usize) -> Result<String>;

    /// Column header text (the column name).
    fn column_header(&self, column: usize) -> Result<&str>;
}
