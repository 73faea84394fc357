//! Read-only derivations over an imported store.
//!
//! [`PreprocessEngine`] produces the rows with missing key-role values and
//! the rows whose key-role tuple occurs more than once. Neither derivation
//! mutates its input.

#![deny(unsafe_code)]

pub mod engine;
pub mod error;

pub use engine::{DerivedViews, DuplicateGroup, PreprocessEngine, PreprocessSummary};
pub use error::{PreprocessError, Result};
