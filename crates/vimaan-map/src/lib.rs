//! Mapping of spreadsheet columns to semantic roles.
//!
//! [`FieldMapping`] tracks which column backs each required [`Role`] and
//! whether the assignment is complete. [`SuggestionEngine`] proposes an
//! initial assignment from column names.

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod patterns;
pub mod state;

pub use engine::{DEFAULT_MIN_CONFIDENCE, RoleSuggestion, SuggestionEngine, SuggestionResult};
pub use error::{MappingError, Result};
pub use state::{Assignment, FieldMapping, MappingSummary, ResolvedMapping, ResolvedRole};
