//! Thread-safe per-project index cache
//!
//! The store maps a resolved project root to its current [`ProjectSnapshot`].
//! Snapshots are immutable and shared as `Arc`; a rebuild replaces the whole
//! snapshot, so readers never observe a half-built index.
//!
//! # Generations
//!
//! ```text
//! begin_build(root) ──> ticket #7 ──(walk)──> publish(#7) ─┐
//! begin_build(root) ──> ticket #8 ─(walk)─> publish(#8) ───┤
//!                                                          v
//!                         published: #8   (#7 arrives late and is discarded)
//! ```
//!
//! Builds are never cancelled. Each one takes a ticket when it starts and its
//! result is only published if no newer build has been published since.
//!
//! # Thread Safety
//!
//! One `parking_lot::RwLock` guards the map. Locks are held only to swap
//! `Arc`s, never across a walk or an `.await`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::schema::{StateIndex, SymbolRecord};

/// One published view of a project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSnapshot {
    pub root: PathBuf,
    /// Flat extraction result in walk order
    pub records: Arc<[SymbolRecord]>,
    /// Presented index (filtered when `filter_query` is set)
    pub index: StateIndex,
    pub filter_query: Option<String>,
    /// Ticket of the build that produced `records`
    pub generation: u64,
}

impl ProjectSnapshot {
    pub fn is_filtered(&self) -> bool {
        self.filter_query.is_some()
    }
}

/// Permission to publish one build result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTicket {
    root: PathBuf,
    generation: u64,
}

impl BuildTicket {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct ProjectEntry {
    published: Option<Arc<ProjectSnapshot>>,
}

/// Per-project snapshot cache shared between sessions and watchers
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: RwLock<HashMap<PathBuf, ProjectEntry>>,
    next_generation: AtomicU64,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project without building it
    pub fn ensure(&self, root: &Path) {
        self.projects.write().entry(root.to_path_buf()).or_default();
    }

    /// Current snapshot of a project
    pub fn get(&self, root: &Path) -> Option<Arc<ProjectSnapshot>> {
        self.projects
            .read()
            .get(root)
            .and_then(|entry| entry.published.clone())
    }

    pub fn contains(&self, root: &Path) -> bool {
        self.projects.read().contains_key(root)
    }

    /// Start a build; registers the project lazily
    pub fn begin_build(&self, root: &Path) -> BuildTicket {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.ensure(root);
        BuildTicket {
            root: root.to_path_buf(),
            generation,
        }
    }

    /// Publish a finished build.
    ///
    /// Returns the new snapshot, or `None` when the result was discarded
    /// because a newer build already published or the project was evicted.
    pub fn publish(
        &self,
        ticket: BuildTicket,
        records: Arc<[SymbolRecord]>,
        index: StateIndex,
        filter_query: Option<String>,
    ) -> Option<Arc<ProjectSnapshot>> {
        let mut projects = self.projects.write();
        let Some(entry) = projects.get_mut(&ticket.root) else {
            tracing::debug!(
                "Discarding build #{} for evicted project {}",
                ticket.generation,
                ticket.root.display()
            );
            return None;
        };

        if let Some(current) = &entry.published {
            if current.generation > ticket.generation {
                tracing::debug!(
                    "Discarding stale build #{} for {} (published #{})",
                    ticket.generation,
                    ticket.root.display(),
                    current.generation
                );
                return None;
            }
        }

        let snapshot = Arc::new(ProjectSnapshot {
            root: ticket.root,
            records,
            index,
            filter_query,
            generation: ticket.generation,
        });
        entry.published = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Replace the presented index of the snapshot produced by `generation`.
    ///
    /// Used by filter mode to re-group without a walk. Fails (returns `None`)
    /// if a different build has been published in the meantime.
    pub fn replace_view(
        &self,
        root: &Path,
        generation: u64,
        index: StateIndex,
        filter_query: Option<String>,
    ) -> Option<Arc<ProjectSnapshot>> {
        let mut projects = self.projects.write();
        let entry = projects.get_mut(root)?;
        let current = entry.published.as_ref()?;
        if current.generation != generation {
            return None;
        }

        let snapshot = Arc::new(ProjectSnapshot {
            root: current.root.clone(),
            records: current.records.clone(),
            index,
            filter_query,
            generation,
        });
        entry.published = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Drop a project; in-flight builds for it will be discarded
    pub fn evict(&self, root: &Path) -> bool {
        let removed = self.projects.write().remove(root).is_some();
        if removed {
            tracing::debug!("Evicted project {}", root.display());
        }
        removed
    }

    pub fn clear(&self) {
        self.projects.write().clear();
    }

    /// Registered project roots, sorted
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self.projects.read().keys().cloned().collect();
        roots.sort();
        roots
    }

    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }
}
