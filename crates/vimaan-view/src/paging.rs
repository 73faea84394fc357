//! Bounded materialisation of display strings.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::TableSource;

/// Page position over a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based page number.
    pub page: usize,
    pub rows_per_page: usize,
}

impl Pagination {
    /// `rows_per_page` is raised to at least one.
    pub fn new(page: usize, rows_per_page: usize) -> Self {
        Self {
            page,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.rows_per_page.max(1))
    }

    /// Row range for this page, empty when the page lies past the end.
    pub fn row_range(&self, total_rows: usize) -> Range<usize> {
        let start = self
            .page
            .saturating_mul(self.rows_per_page)
            .min(total_rows);
        let end = start.saturating_add(self.rows_per_page).min(total_rows);
        start..end
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, 50)
    }
}

/// Display strings for a contiguous block of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    pub first_row: usize,
    pub total_rows: usize,
    pub column_headers: Vec<String>,
    pub row_headers: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Read `rows` (clamped to the source's row count) from any [`TableSource`].
pub fn materialize<S: TableSource + ?Sized>(source: &S, rows: Range<usize>) -> Result<Window> {
    let total_rows = source.row_count();
    let end = rows.end.min(total_rows);
    let start = rows.start.min(end);
    let columns = source.column_count();

    let column_headers = (0..columns)
        .map(|column| source.column_header(column).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;

    let mut row_headers = Vec::with_capacity(end - start);
    let mut cells = Vec::with_capacity(end - start);
    for row in start..end {
        row_headers.push(source.row_header(row)?);
        let values = (0..columns)
            .map(|column| source.display_value(row, column).map(|v| v.into_owned()))
            .collect::<Result<Vec<_>>>()?;
        cells.push(values);
    }

    Ok(Window {
        first_row: start,
        total_rows,
        column_headers,
        row_headers,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ranges_clamp_to_total() {
        let paging = Pagination::new(2, 10);
        assert_eq!(paging.row_range(25), 20..25);
        assert_eq!(paging.page_count(25), 3);
        assert_eq!(Pagination::new(5, 10).row_range(25), 25..25);
        assert_eq!(Pagination::new(0, 0).rows_per_page, 1);
    }
}
