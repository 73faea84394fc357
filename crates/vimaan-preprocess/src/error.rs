//! Error types for preprocessing.

use thiserror::Error;

use vimaan_map::MappingError;
use vimaan_model::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    /// The mapping is incomplete or names a column the store lacks.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A key role is not among the mapping's required roles.
    #[error("key role {role} is not part of the field mapping")]
    RoleNotMapped { role: Role },

    #[error("no key roles configured for preprocessing")]
    NoKeyRoles,
}

impl PreprocessError {
    pub fn is_incomplete_mapping(&self) -> bool {
        matches!(
            self,
            Self::Mapping(MappingError::IncompleteMapping { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
