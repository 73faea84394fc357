//! Command implementations. Each returns a report; printing is left to the caller.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info_span, trace};

use vimaan_core::{Session, Settings};
use vimaan_map::{Assignment, MappingSummary, SuggestionResult};
use vimaan_model::{Role, RowLabel};
use vimaan_preprocess::{DuplicateGroup, PreprocessSummary};
use vimaan_view::{Pagination, TableSource, Window};

use crate::logging::redact_value;

/// Columns named on the command line, overriding suggestions.
#[derive(Debug, Clone, Default)]
pub struct RoleOverrides {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub airport_code: Option<String>,
}

impl RoleOverrides {
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        [
            (Role::City, &self.city),
            (Role::State, &self.state),
            (Role::Country, &self.country),
            (Role::AirportCode, &self.airport_code),
        ]
        .into_iter()
        .filter_map(|(role, column)| column.as_deref().map(|column| (role, column)))
    }
}

/// Import `path` and apply any explicit role columns on top of suggestions.
pub fn open_session(path: &Path, settings: &Settings, overrides: &RoleOverrides) -> Result<Session> {
    let mut session = Session::new(settings);
    session
        .import_file(path)
        .with_context(|| format!("import {}", path.display()))?;
    for (role, column) in overrides.iter() {
        session
            .set_role(role, Assignment::column(column))
            .with_context(|| format!("assign --{} {column}", role_flag(role)))?;
    }
    Ok(session)
}

fn role_flag(role: Role) -> &'static str {
    match role {
        Role::AirportCode => "iata",
        other => other.key(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub mapping: MappingSummary,
    pub complete: bool,
    pub unassigned: Vec<Role>,
}

pub fn run_inspect(path: &Path, settings: &Settings) -> Result<InspectReport> {
    let _span = info_span!("inspect", path = %path.display()).entered();
    let session = open_session(path, settings, &RoleOverrides::default())?;
    let mapping = session.mapping();
    let columns = session
        .store()
        .columns()
        .iter()
        .map(|name| ColumnInfo {
            name: name.clone(),
            role: mapping
                .required_roles()
                .iter()
                .copied()
                .find(|&role| mapping.column_for(role) == Some(name.as_str())),
        })
        .collect();
    Ok(InspectReport {
        path: path.to_path_buf(),
        rows: session.store().row_count(),
        columns,
        mapping: session.mapping_summary(),
        complete: mapping.is_complete(),
        unassigned: mapping.unassigned_roles(),
    })
}

pub fn run_suggest(path: &Path, settings: &Settings) -> Result<SuggestionResult> {
    let _span = info_span!("suggest", path = %path.display()).entered();
    let session = open_session(path, settings, &RoleOverrides::default())?;
    Ok(session.suggestions())
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    /// One-based page number.
    pub page: usize,
    pub page_count: usize,
    pub window: Window,
}

/// Render one page of the imported table. `page` is one-based.
pub fn run_preview(
    path: &Path,
    settings: &Settings,
    page: usize,
    rows_per_page: Option<usize>,
) -> Result<PreviewReport> {
    let _span = info_span!("preview", path = %path.display(), page).entered();
    let session = open_session(path, settings, &RoleOverrides::default())?;
    let mut pagination = settings.pagination(page.saturating_sub(1));
    if let Some(rows) = rows_per_page {
        pagination = Pagination::new(pagination.page, rows);
    }
    let model = session.model();
    let total = model.row_count();
    let page_count = pagination.page_count(total);
    if total > 0 && pagination.page >= page_count {
        return Err(anyhow!("page {page} is past the last page ({page_count})"));
    }
    let window = model.window(pagination.row_range(total))?;
    Ok(PreviewReport {
        page: pagination.page + 1,
        page_count,
        window,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedKind {
    Missing,
    Duplicates,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappedColumn {
    pub role: Role,
    pub column: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub row: RowLabel,
    pub cells: Vec<String>,
}

/// A derived store rendered for output.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedReport {
    pub view: DerivedKind,
    pub mapping: Vec<MappedColumn>,
    pub summary: PreprocessSummary,
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<DuplicateGroup>>,
}

/// Import, preprocess on a background thread and report one derived view.
pub fn run_derived(
    path: &Path,
    settings: &Settings,
    overrides: &RoleOverrides,
    kind: DerivedKind,
) -> Result<DerivedReport> {
    let _span = info_span!("derive", path = %path.display(), view = ?kind).entered();
    let mut session = open_session(path, settings, overrides)?;
    let mapping = session
        .mapping()
        .resolved_columns()
        .context("resolve field mapping")?
        .entries()
        .iter()
        .map(|entry| MappedColumn {
            role: entry.role,
            column: entry.column.clone(),
        })
        .collect();

    let (sender, receiver) = mpsc::channel();
    let handle = session.spawn_preprocess(sender);
    let update = receiver
        .recv()
        .context("preprocessing stopped without a result")?;
    handle
        .join()
        .map_err(|_| anyhow!("preprocessing thread panicked"))?;

    if !session.apply_update(update).context("preprocess")? {
        return Err(anyhow!("preprocessing result was superseded"));
    }
    let derived = session.derived();
    let summary = derived
        .summary
        .ok_or_else(|| anyhow!("preprocessing produced no summary"))?;

    let model = match kind {
        DerivedKind::Missing => &derived.missing,
        DerivedKind::Duplicates => &derived.duplicates,
    };
    let window = model.window(0..model.row_count())?;
    let rows = model
        .store()
        .row_labels()
        .iter()
        .copied()
        .zip(window.cells)
        .map(|(row, cells)| ReportRow { row, cells })
        .collect();

    let groups = match kind {
        DerivedKind::Missing => None,
        DerivedKind::Duplicates => {
            for group in &derived.groups {
                let key = group.values.join(" | ");
                trace!(
                    key = redact_value(&key),
                    rows = group.len(),
                    "duplicate group"
                );
            }
            Some(derived.groups.clone())
        }
    };
    debug!(
        total = summary.total_rows,
        missing = summary.missing_rows,
        duplicates = summary.duplicate_rows,
        "preprocessing finished"
    );

    Ok(DerivedReport {
        view: kind,
        mapping,
        summary,
        columns: window.column_headers,
        rows,
        groups,
    })
}
