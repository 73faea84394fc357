//! Suggests a column for each role from column names alone.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use serde::Serialize;
use vimaan_model::Role;

use crate::patterns::{normalize_text, role_synonyms};

/// Default minimum score for a suggestion to be reported.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.8;

/// A suggested column for one role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSuggestion {
    pub role: Role,
    pub column: String,
    /// Score in `0.0..=1.0`; exact synonym matches score 1.0.
    pub confidence: f32,
}

/// Result of a suggestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestionResult {
    /// Suggestions in role order.
    pub suggestions: Vec<RoleSuggestion>,
    /// Roles no column scored high enough for.
    pub unmatched_roles: Vec<Role>,
    /// Columns not suggested for any role.
    pub unmapped_columns: Vec<String>,
}

impl SuggestionResult {
    pub fn column_for(&self, role: Role) -> Option<&str> {
        self.suggestions
            .iter()
            .find(|s| s.role == role)
            .map(|s| s.column.as_str())
    }
}

/// Fuzzy matcher between column names and role synonyms.
///
/// Matching is one-to-one: each column is suggested for at most one role and
/// each role receives at most one column. Candidates are taken greedily by
/// descending score; ties keep role order, then column order.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    roles: Vec<Role>,
    min_confidence: f32,
}

struct Candidate {
    role_pos: usize,
    column_pos: usize,
    confidence: f32,
}

impl SuggestionEngine {
    pub fn new(roles: impl IntoIterator<Item = Role>, min_confidence: f32) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            min_confidence,
        }
    }

    pub fn suggest(&self, columns: &[String]) -> SuggestionResult {
        let normalized: Vec<String> = columns.iter().map(|c| normalize_text(c)).collect();

        let mut candidates = Vec::with_capacity(self.roles.len() * columns.len());
        for (role_pos, &role) in self.roles.iter().enumerate() {
            for (column_pos, column) in normalized.iter().enumerate() {
                candidates.push(Candidate {
                    role_pos,
                    column_pos,
                    confidence: score(column, role),
                });
            }
        }
        // Stable sort keeps role/column order among equal scores.
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let mut taken_roles = BTreeSet::new();
        let mut taken_columns = BTreeSet::new();
        let mut picked: Vec<(usize, RoleSuggestion)> = Vec::new();
        for candidate in candidates {
            if candidate.confidence < self.min_confidence {
                break;
            }
            if taken_roles.contains(&candidate.role_pos)
                || taken_columns.contains(&candidate.column_pos)
            {
                continue;
            }
            taken_roles.insert(candidate.role_pos);
            taken_columns.insert(candidate.column_pos);
            picked.push((
                candidate.role_pos,
                RoleSuggestion {
                    role: self.roles[candidate.role_pos],
                    column: columns[candidate.column_pos].clone(),
                    confidence: candidate.confidence,
                },
            ));
        }
        picked.sort_by_key(|(role_pos, _)| *role_pos);

        let unmatched_roles = self
            .roles
            .iter()
            .enumerate()
            .filter(|(pos, _)| !taken_roles.contains(pos))
            .map(|(_, role)| *role)
            .collect();
        let unmapped_columns = columns
            .iter()
            .enumerate()
            .filter(|(pos, _)| !taken_columns.contains(pos))
            .map(|(_, column)| column.clone())
            .collect();

        tracing::debug!(
            suggested = picked.len(),
            min_confidence = self.min_confidence,
            "role suggestions computed"
        );

        SuggestionResult {
            suggestions: picked.into_iter().map(|(_, s)| s).collect(),
            unmatched_roles,
            unmapped_columns,
        }
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(Role::ALL, DEFAULT_MIN_CONFIDENCE)
    }
}

fn score(normalized_column: &str, role: Role) -> f32 {
    let synonyms = role_synonyms(role);
    if synonyms.iter().any(|synonym| *synonym == normalized_column) {
        return 1.0;
    }
    synonyms
        .iter()
        .map(|synonym| jaro_similarity(normalized_column.chars(), synonym.chars()))
        .fold(0.0f64, f64::max) as f32
}
