//! State index construction
//!
//! One builder instance performs at most one directory walk over
//! `<project>/<state_dir>`; the resulting flat record list answers all
//! three functional-type queries. Construct a new builder to reindex.
//!
//! Grouping of a type's records:
//!
//! ```text
//! Actions
//! ├── resetAll            (no context, extraction order)
//! ├── user                (first context seen)
//! │   ├── loginUser
//! │   └── logoutUser
//! └── items               (next context seen)
//!     └── fetchItems
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::IndexConfig;
use crate::extract::SymbolExtractor;
use crate::schema::{FunctionalType, IndexEntry, StateIndex, SymbolRecord};
use crate::walker::{walk_tree, walk_tree_blocking, WalkOptions};

/// Transform applied to the flat record list before grouping (filter mode)
pub type RecordFilter = dyn Fn(&[SymbolRecord]) -> Vec<SymbolRecord> + Send + Sync;

/// Builds the hierarchical index for one project
pub struct StateIndexBuilder {
    project_root: PathBuf,
    state_root: PathBuf,
    options: WalkOptions,
    extractor: SymbolExtractor,
    /// Memoized walk result
    records: OnceCell<Arc<[SymbolRecord]>>,
}

impl StateIndexBuilder {
    /// Create a builder for a resolved project root
    pub fn new(project_root: impl Into<PathBuf>, config: &IndexConfig) -> Self {
        let project_root = project_root.into();
        let state_root = project_root.join(&config.state_dir);
        let extractor = SymbolExtractor::new(config.state_dir.clone()).with_state_root(&state_root);
        Self {
            project_root,
            state_root,
            options: config.walk_options(),
            extractor,
            records: OnceCell::new(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn state_root(&self) -> &Path {
        &self.state_root
    }

    /// Flat records of the state tree, walking it on first use
    pub async fn records(&self) -> Arc<[SymbolRecord]> {
        self.records
            .get_or_init(|| async {
                let records = walk_tree(&self.state_root, &self.options, &self.extractor).await;
                log_walk(&self.state_root, &records);
                Arc::from(records)
            })
            .await
            .clone()
    }

    /// Blocking counterpart of [`records`](Self::records)
    pub fn records_blocking(&self) -> Arc<[SymbolRecord]> {
        if let Some(records) = self.records.get() {
            return records.clone();
        }
        let records = walk_tree_blocking(&self.state_root, &self.options, &self.extractor);
        log_walk(&self.state_root, &records);
        let records: Arc<[SymbolRecord]> = Arc::from(records);
        // A concurrent async walk may have won; either result is a full walk
        let _ = self.records.set(records.clone());
        self.records.get().cloned().unwrap_or(records)
    }

    /// The category entry for one functional type
    pub async fn entry_for_type(
        &self,
        functional_type: FunctionalType,
        filter: Option<&RecordFilter>,
    ) -> IndexEntry {
        let records = self.records().await;
        let filtered = apply_filter(&records, filter);
        group_by_context(
            functional_type,
            filtered
                .iter()
                .filter(|r| r.functional_type == functional_type),
        )
    }

    /// Build the full index
    pub async fn build(&self) -> StateIndex {
        let records = self.records().await;
        group_records(&records, None)
    }

    /// Build the index from the records that pass `filter`
    pub async fn build_filtered(&self, filter: &RecordFilter) -> StateIndex {
        let records = self.records().await;
        group_records(&records, Some(filter))
    }

    /// Blocking build, optionally filtered
    pub fn build_blocking(&self, filter: Option<&RecordFilter>) -> StateIndex {
        let records = self.records_blocking();
        group_records(&records, filter)
    }
}

/// Build a project's index with a fresh walk
pub async fn build_index(project_root: &Path, config: &IndexConfig) -> StateIndex {
    StateIndexBuilder::new(project_root, config).build().await
}

/// Group a flat record list into the three type categories.
///
/// Pure: the same records always give the same tree. `filter` runs once over
/// the whole list before records are split by type.
pub fn group_records(records: &[SymbolRecord], filter: Option<&RecordFilter>) -> StateIndex {
    let filtered = apply_filter(records, filter);
    let entry = |ty: FunctionalType| {
        group_by_context(ty, filtered.iter().filter(|r| r.functional_type == ty))
    };
    StateIndex {
        actions: entry(FunctionalType::Actions),
        reducers: entry(FunctionalType::Reducers),
        selectors: entry(FunctionalType::Selectors),
    }
}

/// Build one category entry: context-less leaves first, then one group per
/// context in first-seen order.
pub fn group_by_context<'a, I>(functional_type: FunctionalType, records: I) -> IndexEntry
where
    I: IntoIterator<Item = &'a SymbolRecord>,
{
    let mut loose = Vec::new();
    let mut groups: Vec<(String, Vec<IndexEntry>)> = Vec::new();
    let mut group_index: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        match record.context.as_deref() {
            None => loose.push(IndexEntry::leaf(record)),
            Some(context) => {
                let idx = *group_index.entry(context).or_insert_with(|| {
                    groups.push((context.to_string(), Vec::new()));
                    groups.len() - 1
                });
                groups[idx].1.push(IndexEntry::leaf(record));
            }
        }
    }

    let mut children = loose;
    children.extend(
        groups
            .into_iter()
            .map(|(label, leaves)| IndexEntry::group(label, leaves)),
    );
    IndexEntry::group(functional_type.label(), children)
}

fn apply_filter<'a>(
    records: &'a [SymbolRecord],
    filter: Option<&RecordFilter>,
) -> std::borrow::Cow<'a, [SymbolRecord]> {
    match filter {
        Some(f) => std::borrow::Cow::Owned(f(records)),
        None => std::borrow::Cow::Borrowed(records),
    }
}

fn log_walk(state_root: &Path, records: &[SymbolRecord]) {
    let count = |ty: FunctionalType| records.iter().filter(|r| r.functional_type == ty).count();
    tracing::info!(
        "Indexed {} symbols under {} ({} actions, {} reducers, {} selectors, {} unknown)",
        records.len(),
        state_root.display(),
        count(FunctionalType::Actions),
        count(FunctionalType::Reducers),
        count(FunctionalType::Selectors),
        count(FunctionalType::Unknown)
    );
}
