//! Conversion of decoded frames into tabular stores.

use polars::prelude::*;
use vimaan_model::{Cell, TabularStore};

use crate::error::Result;

/// Map one polars value onto a [`Cell`].
///
/// Nulls become [`Cell::Absent`]. Integer, float, boolean and string values
/// keep their kind; anything else is rendered to text.
pub fn any_to_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => Cell::Absent,
        AnyValue::Boolean(b) => Cell::Boolean(b),
        AnyValue::Int8(v) => Cell::Integer(i64::from(v)),
        AnyValue::Int16(v) => Cell::Integer(i64::from(v)),
        AnyValue::Int32(v) => Cell::Integer(i64::from(v)),
        AnyValue::Int64(v) => Cell::Integer(v),
        AnyValue::UInt8(v) => Cell::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Cell::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Cell::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or_else(|_| Cell::Text(v.to_string()), Cell::Integer),
        AnyValue::Float32(v) => Cell::Float(f64::from(v)),
        AnyValue::Float64(v) => Cell::Float(v),
        AnyValue::String(s) => Cell::Text(s.to_string()),
        AnyValue::StringOwned(s) => Cell::Text(s.to_string()),
        other => {
            let s = other.to_string();
            // Display wraps some values in quotes
            if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
                Cell::Text(s[1..s.len() - 1].to_string())
            } else {
                Cell::Text(s)
            }
        }
    }
}

/// Build a store from every column and row of `df`.
///
/// Rows are labelled `first_label`, `first_label + 1`, ... in frame order.
pub fn store_from_frame(df: &DataFrame, first_label: u64) -> Result<TabularStore> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let height = df.height();
    let mut rows: Vec<Vec<Cell>> = (0..height)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in df.get_columns() {
        for (idx, row) in rows.iter_mut().enumerate() {
            row.push(any_to_cell(column.get(idx)?));
        }
    }

    Ok(TabularStore::with_line_numbers(columns, rows, first_label)?)
}
