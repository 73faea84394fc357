//! Error types for mapping operations.

use thiserror::Error;

use vimaan_model::Role;

/// Errors from mapping operations.
///
/// A failed operation leaves the mapping exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The column does not exist in the bound store.
    #[error("column '{column}' not found (assigned to {role})")]
    UnknownColumn { role: Role, column: String },

    /// Resolution was attempted while some required roles are unassigned.
    #[error("mapping is incomplete; unassigned roles: {}", join_roles(.missing))]
    IncompleteMapping { missing: Vec<Role> },

    /// The role is not one of the mapping's required roles.
    #[error("role {role} is not part of this mapping")]
    RoleNotRequired { role: Role },
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|role| role.key())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, MappingError>;
