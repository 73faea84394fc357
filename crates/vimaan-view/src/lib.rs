//! Table view adapter for imported stores.
//!
//! [`VirtualTableModel`] answers row/column counts, headers and per-cell
//! display strings on demand, and swaps its backing store atomically with
//! reset notifications. [`materialize`] renders only a requested window.

#![deny(unsafe_code)]

pub mod error;
pub mod model;
pub mod paging;
pub mod source;

pub use error::{Result, ViewError};
pub use model::{CellIndex, ModelEvent, ModelListener, VirtualTableModel};
pub use paging::{Pagination, Window, materialize};
pub use source::TableSource;
