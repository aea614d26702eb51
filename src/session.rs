//! Host-facing index session
//!
//! An [`IndexSession`] tracks which project the host is looking at and keeps
//! that project's snapshot in the shared [`ProjectStore`] up to date.
//!
//! # Modes
//!
//! ```text
//!              active document found
//!  NoProject ─────────────────────────> Indexed
//!      ^                                 │   ^
//!      │ active document                 │   │ set_filter_mode(false)
//!      │ outside any project             v   │
//!      └───────────────────────────── Filtered
//!                                   set_filter_mode(true, query)
//! ```
//!
//! While `Filtered`, switching between documents of the same project keeps
//! the filtered view instead of rebuilding it. Saves always rebuild and
//! re-apply the active filter.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::builder::{group_records, RecordFilter, StateIndexBuilder};
use crate::config::TangerineConfig;
use crate::error::{Result, TangerineError};
use crate::fuzzy::{search_filter, FuzzySearcher};
use crate::locator::resolve_project_root;
use crate::schema::{JumpTarget, StateIndex, SymbolRecord};
use crate::store::{ProjectSnapshot, ProjectStore};

/// Presentation mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// The active document belongs to no project
    NoProject,
    /// Full index of the active project
    Indexed,
    /// Index re-grouped through a fuzzy filter
    Filtered,
}

#[derive(Debug, Default)]
struct SessionState {
    active_root: Option<PathBuf>,
    /// Last document the host reported, for error reporting
    last_document: Option<PathBuf>,
    filter: Option<String>,
    /// Projects this session has built; evicted on shutdown
    touched: HashSet<PathBuf>,
}

impl SessionState {
    fn mode(&self) -> IndexMode {
        match (&self.active_root, &self.filter) {
            (None, _) => IndexMode::NoProject,
            (Some(_), None) => IndexMode::Indexed,
            (Some(_), Some(_)) => IndexMode::Filtered,
        }
    }
}

/// Index-owning component driven by host notifications
pub struct IndexSession {
    store: Arc<ProjectStore>,
    config: Arc<TangerineConfig>,
    state: Mutex<SessionState>,
}

impl IndexSession {
    pub fn new(store: Arc<ProjectStore>, config: Arc<TangerineConfig>) -> Self {
        Self {
            store,
            config,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Session with a private store and default configuration
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(ProjectStore::new()),
            Arc::new(TangerineConfig::default()),
        )
    }

    pub fn store(&self) -> &Arc<ProjectStore> {
        &self.store
    }

    pub fn config(&self) -> &TangerineConfig {
        &self.config
    }

    pub fn mode(&self) -> IndexMode {
        self.state.lock().mode()
    }

    pub fn active_root(&self) -> Option<PathBuf> {
        self.state.lock().active_root.clone()
    }

    pub fn filter_query(&self) -> Option<String> {
        self.state.lock().filter.clone()
    }

    /// The host switched to another document.
    pub async fn on_active_document(&self, path: &Path) -> IndexMode {
        let root = match self.locate(path) {
            Some(root) => root,
            None => {
                let mut state = self.state.lock();
                state.active_root = None;
                state.filter = None;
                return IndexMode::NoProject;
            }
        };

        {
            let mut state = self.state.lock();
            let same_project = state.active_root.as_deref() == Some(root.as_path());
            if same_project && state.filter.is_some() && self.store.get(&root).is_some() {
                tracing::debug!("Filter active for {}, keeping view", root.display());
                return IndexMode::Filtered;
            }
            if !same_project {
                state.filter = None;
            }
            state.active_root = Some(root.clone());
            state.touched.insert(root.clone());
        }

        self.rebuild(&root).await;
        self.mode()
    }

    /// A document was saved; rebuild the project it belongs to.
    ///
    /// Saves outside any project change nothing.
    pub async fn on_save(&self, path: &Path) -> IndexMode {
        let Some(root) = self.locate(path) else {
            return self.mode();
        };

        self.state.lock().touched.insert(root.clone());
        self.rebuild(&root).await;
        self.mode()
    }

    /// Rebuild the active project from a fresh walk
    pub async fn reindex(&self) -> Result<IndexMode> {
        let root = self.active()?;
        self.rebuild(&root).await;
        Ok(self.mode())
    }

    /// Enter or leave filter mode.
    ///
    /// Enabling with `None` re-applies the current query (or the empty
    /// query, which matches everything). The view is re-grouped from the
    /// cached records; the filesystem is not walked again.
    pub async fn set_filter_mode(&self, enabled: bool, query: Option<&str>) -> Result<IndexMode> {
        let filter = if enabled {
            FuzzySearcher::new(self.config.search.search_threshold)?;
            let current = self.state.lock().filter.clone();
            Some(query.map(str::to_string).or(current).unwrap_or_default())
        } else {
            None
        };

        let root = {
            let mut state = self.state.lock();
            let Some(root) = state.active_root.clone() else {
                state.filter = None;
                return Ok(IndexMode::NoProject);
            };
            state.filter = filter;
            root
        };

        match self.store.get(&root) {
            Some(snapshot) => {
                self.reconcile(&root, snapshot);
            }
            None => {
                self.rebuild(&root).await;
            }
        }
        Ok(self.mode())
    }

    /// Current snapshot of the active project
    pub fn snapshot(&self) -> Option<Arc<ProjectSnapshot>> {
        let root = self.active_root()?;
        self.store.get(&root)
    }

    /// Presented index of the active project
    pub fn current_index(&self) -> Option<StateIndex> {
        self.snapshot().map(|snapshot| snapshot.index.clone())
    }

    /// Ranked records of the active project matching `query`.
    ///
    /// `threshold` defaults to the configured search threshold. Without an
    /// active project the result is empty.
    pub fn search(&self, query: &str, threshold: Option<f64>) -> Result<Vec<SymbolRecord>> {
        let mut searcher =
            FuzzySearcher::new(threshold.unwrap_or(self.config.search.search_threshold))?;
        if let Some(limit) = self.config.search.limit {
            searcher = searcher.with_limit(limit);
        }
        Ok(self
            .snapshot()
            .map(|snapshot| searcher.filter(&snapshot.records, query))
            .unwrap_or_default())
    }

    /// Declaration site of the best strict match for `query`
    pub fn jump_target(&self, query: &str) -> Result<JumpTarget> {
        let Some(snapshot) = self.snapshot() else {
            let path = self
                .state
                .lock()
                .last_document
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            return Err(TangerineError::ProjectNotFound { path });
        };
        let searcher = FuzzySearcher::new(self.config.search.jump_threshold)?;
        let hit = searcher.best_match(&snapshot.records, query)?;
        Ok(hit.record.jump_target())
    }

    /// Evict every project this session built and return to `NoProject`
    pub fn shutdown(&self) {
        let touched = {
            let mut state = self.state.lock();
            state.active_root = None;
            state.filter = None;
            std::mem::take(&mut state.touched)
        };
        for root in touched {
            self.store.evict(&root);
        }
    }

    fn locate(&self, path: &Path) -> Option<PathBuf> {
        self.state.lock().last_document = Some(path.to_path_buf());
        match resolve_project_root(path, &self.config.index.state_dir) {
            Ok(root) => Some(root),
            Err(TangerineError::ProjectNotFound { .. }) => {
                tracing::debug!("{} is outside any project", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Could not resolve project for {}: {}", path.display(), e);
                None
            }
        }
    }

    fn active(&self) -> Result<PathBuf> {
        let state = self.state.lock();
        match &state.active_root {
            Some(root) => Ok(root.clone()),
            None => Err(TangerineError::ProjectNotFound {
                path: state
                    .last_document
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(".")),
            }),
        }
    }

    fn group(&self, records: &[SymbolRecord], filter: Option<&str>) -> Result<StateIndex> {
        let filter: Option<Arc<RecordFilter>> = match filter {
            Some(query) => Some(search_filter(
                query,
                FuzzySearcher::new(self.config.search.search_threshold)?,
            )),
            None => None,
        };
        Ok(group_records(records, filter.as_deref()))
    }

    /// Filter that applies to `root` right now: only the active project has one
    fn filter_for(&self, root: &Path) -> Option<String> {
        let state = self.state.lock();
        if state.active_root.as_deref() == Some(root) {
            state.filter.clone()
        } else {
            None
        }
    }

    fn group_or_unfiltered(
        &self,
        root: &Path,
        records: &[SymbolRecord],
        filter: Option<&str>,
    ) -> StateIndex {
        self.group(records, filter).unwrap_or_else(|e| {
            tracing::warn!("Ignoring filter for {}: {}", root.display(), e);
            group_records(records, None)
        })
    }

    /// Walk the project and publish a new snapshot.
    ///
    /// The filter is read after the walk, not when the build starts, so a
    /// `set_filter_mode` that lands while the walk is pending is honoured.
    async fn rebuild(&self, root: &Path) -> Option<Arc<ProjectSnapshot>> {
        let ticket = self.store.begin_build(root);
        let builder = StateIndexBuilder::new(root, &self.config.index);
        let records = builder.records().await;

        let filter = self.filter_for(root);
        let index = self.group_or_unfiltered(root, &records, filter.as_deref());
        let snapshot = self.store.publish(ticket, records, index, filter)?;
        tracing::debug!(
            "Published build #{} for {}",
            snapshot.generation,
            root.display()
        );

        Some(self.reconcile(root, snapshot))
    }

    /// Re-group `snapshot` until its view matches the session's filter.
    ///
    /// Covers a filter change that lands between grouping and publishing.
    fn reconcile(&self, root: &Path, mut snapshot: Arc<ProjectSnapshot>) -> Arc<ProjectSnapshot> {
        loop {
            let current = self.filter_for(root);
            if current == snapshot.filter_query {
                return snapshot;
            }
            let index = self.group_or_unfiltered(root, &snapshot.records, current.as_deref());
            match self
                .store
                .replace_view(root, snapshot.generation, index, current)
            {
                Some(next) => snapshot = next,
                // Another build published in between; check its view instead
                None => match self.store.get(root) {
                    Some(latest) => snapshot = latest,
                    None => return snapshot,
                },
            }
        }
    }
}
