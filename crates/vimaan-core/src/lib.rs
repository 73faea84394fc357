//! Import session orchestration.
//!
//! A [`Session`] ties one imported store to its field mapping, the primary
//! table model and the preprocessing engine. [`Settings`] configures all of
//! them from a TOML file.

#![deny(unsafe_code)]

pub mod background;
pub mod error;
pub mod session;
pub mod settings;

pub use background::{
    DerivedModels, PreprocessJob, PreprocessUpdate, RunStamp, spawn_preprocess,
};
pub use error::{SessionError, SettingsError};
pub use session::{Result, Session};
pub use settings::{MappingSettings, PreprocessSettings, Settings, ViewSettings};
