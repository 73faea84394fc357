//! Import settings loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vimaan_ingest::IngestOptions;
use vimaan_map::{DEFAULT_MIN_CONFIDENCE, SuggestionEngine};
use vimaan_model::Role;
use vimaan_preprocess::PreprocessEngine;
use vimaan_view::Pagination;

use crate::error::SettingsError;

// =============================================================================
// ROOT SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub import: IngestOptions,
    pub mapping: MappingSettings,
    pub preprocess: PreprocessSettings,
    pub view: ViewSettings,
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            origin: path.display().to_string(),
            source,
        })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content).map_err(|source| SettingsError::Parse {
            origin: "<inline>".to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.mapping.min_confidence) {
            return Err(SettingsError::Invalid {
                field: "mapping.min_confidence",
                reason: format!("{} is outside 0.0..=1.0", self.mapping.min_confidence),
            });
        }
        if self.view.rows_per_page == 0 {
            return Err(SettingsError::Invalid {
                field: "view.rows_per_page",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.preprocess.key_roles.is_empty() {
            return Err(SettingsError::Invalid {
                field: "preprocess.key_roles",
                reason: "at least one key role is required".to_string(),
            });
        }
        if let Some(role) = self
            .preprocess
            .key_roles
            .iter()
            .find(|role| !self.mapping.required_roles.contains(role))
        {
            return Err(SettingsError::Invalid {
                field: "preprocess.key_roles",
                reason: format!("{role} is not listed in mapping.required_roles"),
            });
        }
        Ok(())
    }

    pub fn suggestion_engine(&self) -> SuggestionEngine {
        SuggestionEngine::new(
            self.mapping.required_roles.iter().copied(),
            self.mapping.min_confidence,
        )
    }

    pub fn preprocess_engine(&self) -> PreprocessEngine {
        PreprocessEngine::new(self.preprocess.key_roles.iter().copied())
    }

    /// Pagination for a zero-based page using the configured page size.
    pub fn pagination(&self, page: usize) -> Pagination {
        Pagination::new(page, self.view.rows_per_page)
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingSettings {
    /// Roles that must be assigned before preprocessing.
    pub required_roles: Vec<Role>,
    /// Minimum score for a column suggestion.
    pub min_confidence: f32,
    /// Fill unassigned roles from suggestions on import.
    pub auto_suggest: bool,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            required_roles: Role::ALL.to_vec(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            auto_suggest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    /// Roles whose values form the missing-field and duplicate keys.
    pub key_roles: Vec<Role>,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            key_roles: Role::INPUTS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub rows_per_page: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self { rows_per_page: 50 }
    }
}
