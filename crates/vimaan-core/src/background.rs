//! Background preprocessing thread.
//!
//! Derivations run against a frozen store snapshot. Results are sent back over
//! a channel and bound to the secondary models by the receiving thread.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use vimaan_map::FieldMapping;
use vimaan_model::TabularStore;
use vimaan_preprocess::{
    DerivedViews, DuplicateGroup, PreprocessEngine, PreprocessError, PreprocessSummary,
};
use vimaan_view::VirtualTableModel;

/// Identifies the (store, mapping) pair a run was started against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp {
    /// Generation of the primary model.
    pub generation: u64,
    /// Mapping revision of the session.
    pub revision: u64,
}

/// Message sent when a background run finishes.
#[derive(Debug, Clone)]
pub enum PreprocessUpdate {
    Complete {
        stamp: RunStamp,
        views: DerivedViews,
    },
    Failed {
        stamp: RunStamp,
        error: PreprocessError,
    },
}

impl PreprocessUpdate {
    pub fn stamp(&self) -> RunStamp {
        match self {
            Self::Complete { stamp, .. } | Self::Failed { stamp, .. } => *stamp,
        }
    }
}

/// Everything a background run needs, detached from the session.
#[derive(Debug, Clone)]
pub struct PreprocessJob {
    pub stamp: RunStamp,
    pub store: Arc<TabularStore>,
    pub mapping: FieldMapping,
    pub engine: PreprocessEngine,
}

impl PreprocessJob {
    /// Run the derivations on the calling thread.
    pub fn run(&self) -> PreprocessUpdate {
        match self.engine.derive(&self.store, &self.mapping) {
            Ok(views) => PreprocessUpdate::Complete {
                stamp: self.stamp,
                views,
            },
            Err(error) => PreprocessUpdate::Failed {
                stamp: self.stamp,
                error,
            },
        }
    }
}

/// Spawn a background preprocessing thread.
///
/// Exactly one update is sent. A dropped receiver is ignored.
pub fn spawn_preprocess(job: PreprocessJob, sender: Sender<PreprocessUpdate>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let RunStamp {
            generation,
            revision,
        } = job.stamp;
        tracing::debug!(generation, revision, "background preprocessing started");
        let update = job.run();
        if let PreprocessUpdate::Failed { error, .. } = &update {
            tracing::warn!(generation, revision, %error, "background preprocessing failed");
        }
        let _ = sender.send(update);
    })
}

/// Secondary views over the derived stores, with the groups and counts of
/// the run that produced them.
#[derive(Debug, Default)]
pub struct DerivedModels {
    pub missing: VirtualTableModel,
    pub duplicates: VirtualTableModel,
    pub groups: Vec<DuplicateGroup>,
    /// `None` until a run has been bound.
    pub summary: Option<PreprocessSummary>,
}

impl DerivedModels {
    /// Bind both derived stores through the normal reset path.
    pub fn bind(&mut self, views: DerivedViews) {
        self.summary = Some(views.summary());
        self.groups = views.groups;
        self.missing.bind(Arc::new(views.missing));
        self.duplicates.bind(Arc::new(views.duplicates));
    }

    /// Rebind both models to the empty store.
    pub fn reset(&mut self) {
        self.summary = None;
        self.groups.clear();
        self.missing.bind(Arc::new(TabularStore::empty()));
        self.duplicates.bind(Arc::new(TabularStore::empty()));
    }
}
