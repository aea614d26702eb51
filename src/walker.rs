//! Recursive file enumeration and per-file extraction
//!
//! Enumeration is deterministic: depth-first with entries sorted by file name
//! inside each directory. Records come back in that order no matter how many
//! files were read concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐     ┌───────────┐
//! │ collect_files│────>│ concurrent reads     │────>│ flattened  │
//! │ (ignore walk)│     │ (buffered, ordered)  │     │ records    │
//! └──────────────┘     └─────────────────────┘     └───────────┘
//! ```
//!
//! Both the async [`walk_tree`] and the rayon-backed [`walk_tree_blocking`]
//! resolve once, with every file joined; partial results are never exposed.

use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::extract::{read_source, read_source_async, Extractor};
use crate::schema::SymbolRecord;

/// Options for walking a directory tree
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Skip files matched by .gitignore/.ignore rules
    pub respect_gitignore: bool,
    /// Visit dot-files and dot-directories
    pub include_hidden: bool,
    /// File extensions to include (empty = all files)
    pub extensions: Vec<String>,
    /// Maximum directory depth below the root (None = unlimited)
    pub max_depth: Option<usize>,
    /// Upper bound on files read at the same time by the async walk
    pub max_concurrent_reads: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: false,
            include_hidden: true,
            extensions: Vec::new(),
            max_depth: None,
            max_concurrent_reads: 64,
        }
    }
}

impl WalkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_concurrent_reads(mut self, n: usize) -> Self {
        self.max_concurrent_reads = n;
        self
    }

    /// Check the extension filter
    pub fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Enumerate every file below `root` in walk order.
///
/// A missing or unreadable root yields an empty list; unreadable entries
/// inside the tree are skipped.
pub fn collect_files(root: &Path, options: &WalkOptions) -> Vec<PathBuf> {
    if !root.exists() {
        tracing::debug!("Walk root {} does not exist", root.display());
        return Vec::new();
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(!options.include_hidden)
        .ignore(options.respect_gitignore)
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .parents(options.respect_gitignore)
        .require_git(false)
        .follow_links(false)
        .max_depth(options.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Skipping walk entry under {}: {}", root.display(), e);
                continue;
            }
        };
        let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
        if is_file && options.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files
}

/// Walk `root` and extract every file, reading files concurrently.
pub async fn walk_tree<E>(root: &Path, options: &WalkOptions, extractor: &E) -> Vec<SymbolRecord>
where
    E: Extractor + ?Sized,
{
    let walk_root = root.to_path_buf();
    let walk_options = options.clone();
    let files =
        match tokio::task::spawn_blocking(move || collect_files(&walk_root, &walk_options)).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Directory walk of {} failed: {}", root.display(), e);
                return Vec::new();
            }
        };

    let file_count = files.len();
    let records = extract_files(files, options, extractor).await;
    tracing::debug!(
        "Walked {} files under {}: {} records",
        file_count,
        root.display(),
        records.len()
    );
    records
}

/// Read and extract `files` concurrently, keeping their order.
///
/// Files that can no longer be read (removed or locked since they were
/// listed) are skipped.
pub async fn extract_files<E>(
    files: Vec<PathBuf>,
    options: &WalkOptions,
    extractor: &E,
) -> Vec<SymbolRecord>
where
    E: Extractor + ?Sized,
{
    let batches: Vec<Vec<SymbolRecord>> = stream::iter(files)
        .map(|path| async move {
            match read_source_async(&path).await {
                Ok(content) => extractor.extract(&path, &content),
                Err(e) => {
                    tracing::debug!("Skipping {}", e);
                    Vec::new()
                }
            }
        })
        .buffered(options.max_concurrent_reads.max(1))
        .collect()
        .await;
    batches.into_iter().flatten().collect()
}

/// Walk `root` and extract every file on the rayon pool.
///
/// For hosts without an async runtime. Ordering matches [`walk_tree`].
pub fn walk_tree_blocking<E>(root: &Path, options: &WalkOptions, extractor: &E) -> Vec<SymbolRecord>
where
    E: Extractor + ?Sized,
{
    let files = collect_files(root, options);
    extract_files_blocking(&files, extractor)
}

/// Blocking counterpart of [`extract_files`] on the rayon pool
pub fn extract_files_blocking<E>(files: &[PathBuf], extractor: &E) -> Vec<SymbolRecord>
where
    E: Extractor + ?Sized,
{
    let batches: Vec<Vec<SymbolRecord>> = files
        .par_iter()
        .map(|path| match read_source(path) {
            Ok(content) => extractor.extract(path, &content),
            Err(e) => {
                tracing::debug!("Skipping {}", e);
                Vec::new()
            }
        })
        .collect();
    batches.into_iter().flatten().collect()
}
