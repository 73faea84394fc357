//! Field mapping state for the import workflow.
//!
//! A [`FieldMapping`] is created when a store is loaded, edited one role at a
//! time as the operator changes selections, and thrown away when a new store
//! is loaded. It never carries column names across imports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vimaan_model::{Role, TabularStore};

use crate::engine::SuggestionResult;
use crate::error::{MappingError, Result};

/// Value of a single role selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Assignment {
    /// Placeholder selection. Always accepted.
    #[default]
    Unassigned,
    Column(String),
}

impl Assignment {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    pub fn as_column(&self) -> Option<&str> {
        match self {
            Self::Column(name) => Some(name.as_str()),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<String>> for Assignment {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unassigned, Self::Column)
    }
}

/// Assignment of required roles to the columns of one store.
///
/// The same column may back several roles; the mapping does not enforce
/// role-to-column injectivity and downstream consumers must tolerate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    required: Vec<Role>,
    columns: Vec<String>,
    assigned: BTreeMap<Role, String>,
    complete: bool,
}

impl FieldMapping {
    /// Create an empty mapping over the given column names.
    ///
    /// Repeated roles collapse to their first occurrence.
    pub fn new(required_roles: impl IntoIterator<Item = Role>, columns: Vec<String>) -> Self {
        let mut required: Vec<Role> = Vec::new();
        for role in required_roles {
            if !required.contains(&role) {
                required.push(role);
            }
        }
        let complete = required.is_empty();
        Self {
            required,
            columns,
            assigned: BTreeMap::new(),
            complete,
        }
    }

    /// Mapping over every [`Role`] for the columns of `store`.
    pub fn for_store(store: &TabularStore) -> Self {
        Self::with_roles(Role::ALL, store)
    }

    pub fn with_roles(
        required_roles: impl IntoIterator<Item = Role>,
        store: &TabularStore,
    ) -> Self {
        Self::new(required_roles, store.columns().to_vec())
    }

    pub fn required_roles(&self) -> &[Role] {
        &self.required
    }

    /// Column names that may be selected.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Set or clear one role.
    ///
    /// Clearing always succeeds. Unknown columns and roles outside the required
    /// set are rejected and the previous state is kept.
    pub fn set_role(&mut self, role: Role, assignment: Assignment) -> Result<()> {
        match assignment {
            Assignment::Unassigned => {
                self.assigned.remove(&role);
            }
            Assignment::Column(column) => {
                if !self.required.contains(&role) {
                    return Err(MappingError::RoleNotRequired { role });
                }
                if !self.columns.iter().any(|c| c == &column) {
                    return Err(MappingError::UnknownColumn { role, column });
                }
                self.assigned.insert(role, column);
            }
        }
        self.complete = self.required.iter().all(|r| self.assigned.contains_key(r));
        tracing::debug!(%role, complete = self.complete, "role assignment changed");
        Ok(())
    }

    pub fn assign(&mut self, role: Role, column: &str) -> Result<()> {
        self.set_role(role, Assignment::column(column))
    }

    pub fn clear(&mut self, role: Role) -> Result<()> {
        self.set_role(role, Assignment::Unassigned)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn assignment(&self, role: Role) -> Assignment {
        self.assigned
            .get(&role)
            .cloned()
            .map_or(Assignment::Unassigned, Assignment::Column)
    }

    pub fn column_for(&self, role: Role) -> Option<&str> {
        self.assigned.get(&role).map(String::as_str)
    }

    /// Required roles without a column, in required order.
    pub fn unassigned_roles(&self) -> Vec<Role> {
        self.required
            .iter()
            .copied()
            .filter(|role| !self.assigned.contains_key(role))
            .collect()
    }

    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            required: self.required.len(),
            assigned: self.required.len() - self.unassigned_roles().len(),
        }
    }

    /// Assign suggested columns to roles that are still unassigned.
    ///
    /// Returns the roles that were filled.
    pub fn apply_suggestions(&mut self, result: &SuggestionResult) -> Vec<Role> {
        let mut filled = Vec::new();
        for suggestion in &result.suggestions {
            if self.column_for(suggestion.role).is_some() {
                continue;
            }
            if self.assign(suggestion.role, &suggestion.column).is_ok() {
                filled.push(suggestion.role);
            }
        }
        filled
    }

    /// Resolve every role to a column index within this mapping's columns.
    pub fn resolved_columns(&self) -> Result<ResolvedMapping> {
        self.resolve_with(|column| self.columns.iter().position(|c| c == column))
    }

    /// Resolve every role against `store`, which may differ from the store the
    /// mapping was created for.
    pub fn resolve(&self, store: &TabularStore) -> Result<ResolvedMapping> {
        self.resolve_with(|column| store.column_index(column).ok())
    }

    fn resolve_with(&self, lookup: impl Fn(&str) -> Option<usize>) -> Result<ResolvedMapping> {
        self.ensure_complete()?;
        let mut entries = Vec::with_capacity(self.required.len());
        for &role in &self.required {
            let Some(column) = self.assigned.get(&role) else {
                return Err(MappingError::IncompleteMapping {
                    missing: self.unassigned_roles(),
                });
            };
            let index = lookup(column).ok_or_else(|| MappingError::UnknownColumn {
                role,
                column: column.clone(),
            })?;
            entries.push(ResolvedRole {
                role,
                column: column.clone(),
                index,
            });
        }
        Ok(ResolvedMapping { entries })
    }

    fn ensure_complete(&self) -> Result<()> {
        if self.complete {
            Ok(())
        } else {
            Err(MappingError::IncompleteMapping {
                missing: self.unassigned_roles(),
            })
        }
    }
}

/// Counts for the mapping dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    pub required: usize,
    pub assigned: usize,
}

/// One role bound to a concrete column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRole {
    pub role: Role,
    pub column: String,
    pub index: usize,
}

/// A complete mapping resolved to column indices, in required-role order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMapping {
    entries: Vec<ResolvedRole>,
}

impl ResolvedMapping {
    pub fn entries(&self) -> &[ResolvedRole] {
        &self.entries
    }

    pub fn index_of(&self, role: Role) -> Option<usize> {
        self.entry(role).map(|e| e.index)
    }

    fn entry(&self, role: Role) -> Option<&ResolvedRole> {
        self.entries.iter().find(|e| e.role == role)
    }
}
