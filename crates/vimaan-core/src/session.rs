//! One import session: the bound store, its mapping and its views.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use vimaan_ingest::{IngestOptions, read_store};
use vimaan_map::{Assignment, FieldMapping, MappingSummary, SuggestionEngine, SuggestionResult};
use vimaan_model::{Role, TabularStore};
use vimaan_preprocess::{DerivedViews, PreprocessEngine, PreprocessSummary};
use vimaan_view::VirtualTableModel;

use crate::background::{
    DerivedModels, PreprocessJob, PreprocessUpdate, RunStamp, spawn_preprocess,
};
use crate::error::SessionError;
use crate::settings::Settings;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Owns the current store together with the mapping built for it.
///
/// Store and mapping are replaced as a pair: importing a new store discards
/// the previous mapping so no column names carry over between imports.
#[derive(Debug)]
pub struct Session {
    store: Arc<TabularStore>,
    mapping: FieldMapping,
    /// Bumped on every import and every accepted mapping change.
    revision: u64,
    model: VirtualTableModel,
    derived: DerivedModels,
    required_roles: Vec<Role>,
    suggester: SuggestionEngine,
    engine: PreprocessEngine,
    ingest: IngestOptions,
    auto_suggest: bool,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        let store = Arc::new(TabularStore::empty());
        let required_roles = settings.mapping.required_roles.clone();
        Self {
            mapping: FieldMapping::with_roles(required_roles.iter().copied(), &store),
            revision: 0,
            model: VirtualTableModel::new(Arc::clone(&store)),
            store,
            derived: DerivedModels::default(),
            required_roles,
            suggester: settings.suggestion_engine(),
            engine: settings.preprocess_engine(),
            ingest: settings.import,
            auto_suggest: settings.mapping.auto_suggest,
        }
    }

    /// Replace the bound store and start a fresh mapping for it.
    ///
    /// With auto-suggest on, unassigned roles are filled from column names.
    /// Returns the roles that were filled.
    pub fn import(&mut self, store: impl Into<Arc<TabularStore>>) -> Vec<Role> {
        let store = store.into();
        self.mapping = FieldMapping::with_roles(self.required_roles.iter().copied(), &store);
        self.revision += 1;
        let filled = if self.auto_suggest {
            let suggestions = self.suggester.suggest(store.columns());
            self.mapping.apply_suggestions(&suggestions)
        } else {
            Vec::new()
        };
        tracing::info!(
            rows = store.row_count(),
            columns = store.column_count(),
            suggested = filled.len(),
            complete = self.mapping.is_complete(),
            "store imported"
        );
        self.store = Arc::clone(&store);
        self.model.bind(store);
        self.derived.reset();
        filled
    }

    /// Read a CSV file or Excel workbook with the session's ingest options
    /// and import it. The format follows the file extension.
    ///
    /// A failed read leaves the current store bound.
    pub fn import_file(&mut self, path: &Path) -> Result<Vec<Role>> {
        let store = read_store(path, &self.ingest)?;
        Ok(self.import(store))
    }

    /// Bind the empty store and drop the mapping.
    pub fn clear(&mut self) {
        self.import(TabularStore::empty());
    }

    pub fn store(&self) -> &Arc<TabularStore> {
        &self.store
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Change one role. Derived views built under the old mapping are
    /// dropped. A rejected change leaves the mapping, its revision and the
    /// derived views untouched.
    pub fn set_role(&mut self, role: Role, assignment: Assignment) -> Result<()> {
        self.mapping.set_role(role, assignment)?;
        self.revision += 1;
        self.derived.reset();
        Ok(())
    }

    /// Counter identifying the current mapping; see [`Session::apply_update`].
    pub fn mapping_revision(&self) -> u64 {
        self.revision
    }

    pub fn is_complete(&self) -> bool {
        self.mapping.is_complete()
    }

    pub fn mapping_summary(&self) -> MappingSummary {
        self.mapping.summary()
    }

    /// Suggestions for the bound store's columns, without applying them.
    pub fn suggestions(&self) -> SuggestionResult {
        self.suggester.suggest(self.store.columns())
    }

    pub fn model(&self) -> &VirtualTableModel {
        &self.model
    }

    pub fn derived(&self) -> &DerivedModels {
        &self.derived
    }

    /// Compute both derived stores on the calling thread.
    pub fn preprocess(&self) -> Result<DerivedViews> {
        Ok(self.engine.derive(&self.store, &self.mapping)?)
    }

    pub fn summarize(&self) -> Result<PreprocessSummary> {
        Ok(self.engine.summarize(&self.store, &self.mapping)?)
    }

    fn stamp(&self) -> RunStamp {
        RunStamp {
            generation: self.model.generation(),
            revision: self.revision,
        }
    }

    /// Snapshot of the current store, mapping and engine for a background run.
    pub fn preprocess_job(&self) -> PreprocessJob {
        PreprocessJob {
            stamp: self.stamp(),
            store: Arc::clone(&self.store),
            mapping: self.mapping.clone(),
            engine: self.engine.clone(),
        }
    }

    /// Run preprocessing on a background thread.
    ///
    /// The update arrives on `sender`; pass it to [`Session::apply_update`].
    pub fn spawn_preprocess(&self, sender: Sender<PreprocessUpdate>) -> JoinHandle<()> {
        spawn_preprocess(self.preprocess_job(), sender)
    }

    /// Bind the derived stores of a completed run.
    ///
    /// Updates started before the latest import or mapping change are
    /// ignored and return `Ok(false)`. A failed run is returned as an error.
    pub fn apply_update(&mut self, update: PreprocessUpdate) -> Result<bool> {
        let stamp = update.stamp();
        let current = self.stamp();
        if stamp != current {
            tracing::debug!(
                update_generation = stamp.generation,
                update_revision = stamp.revision,
                generation = current.generation,
                revision = current.revision,
                "discarding stale preprocessing result"
            );
            return Ok(false);
        }
        match update {
            PreprocessUpdate::Complete { views, .. } => {
                self.derived.bind(views);
                Ok(true)
            }
            PreprocessUpdate::Failed { error, .. } => Err(error.into()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
