//! Error types for sessions and settings.

use std::path::PathBuf;

use thiserror::Error;
use vimaan_ingest::IngestError;
use vimaan_map::MappingError;
use vimaan_preprocess::PreprocessError;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
}

impl SessionError {
    /// True when the failure is an unassigned required role.
    pub fn is_incomplete_mapping(&self) -> bool {
        match self {
            Self::Mapping(err) => matches!(err, MappingError::IncompleteMapping { .. }),
            Self::Preprocess(err) => err.is_incomplete_mapping(),
            Self::Ingest(_) => false,
        }
    }
}

/// Errors from loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `origin` is the file path, or `<inline>` for settings parsed from a string.
    #[error("failed to parse settings from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
