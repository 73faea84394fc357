//! Core data types for imported place-name tables.
//!
//! - [`Cell`]: a scalar spreadsheet value, with `Absent` distinct from `""`
//! - [`TabularStore`]: an immutable table with stable row labels
//! - [`Role`]: the semantic fields a column can be mapped to

#![deny(unsafe_code)]

pub mod cell;
pub mod error;
pub mod role;
pub mod table;

pub use cell::{Cell, CellKey, format_float};
pub use error::{Result, TableError};
pub use role::{Role, RoleKind, UnknownRole};
pub use table::{RowLabel, TabularStore};
