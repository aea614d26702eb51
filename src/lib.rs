//! Tangerine: state-tree symbol index with fuzzy navigation
//!
//! This library indexes the `state` directory of a front-end project
//! (actions, reducers, selectors), extracts exported `const` declarations by
//! line pattern, groups them by functional type and context namespace, and
//! finds declarations with a typo-tolerant fuzzy search.
//!
//! # Layout
//!
//! ```text
//! app/
//! └── state/
//!     ├── actions/
//!     │   └── user/login.js     export const loginUser  -> actions, "user"
//!     ├── reducers.js           export const userReducer -> reducers
//!     └── selectors.js          export const getUser    -> selectors
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tangerine_engine::{build_index, resolve_project_root, IndexConfig};
//!
//! # async fn demo() -> tangerine_engine::Result<()> {
//! let root = resolve_project_root(Path::new("app/components/App.jsx"), "state")?;
//! let index = build_index(&root, &IndexConfig::default()).await;
//! for category in index.entries() {
//!     println!("{}: {} symbols", category.label, category.symbol_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Hosts that follow the user's editor use [`IndexSession`], which keeps a
//! per-project snapshot in a shared [`ProjectStore`].

pub mod builder;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod fuzzy;
pub mod locator;
pub mod paths;
pub mod schema;
pub mod session;
pub mod store;
pub mod walker;
pub mod watcher;

// Re-export commonly used types
pub use builder::{build_index, group_records, RecordFilter, StateIndexBuilder};
pub use classify::{classify, classify_path};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::{IndexConfig, SearchConfig, TangerineConfig};
pub use error::{Result, TangerineError};
pub use extract::{Extractor, SymbolExtractor, DEFAULT_STATE_DIR};
pub use fuzzy::{FuzzySearcher, SearchHit, JUMP_THRESHOLD, SEARCH_THRESHOLD};
pub use locator::resolve_project_root;
pub use schema::{FunctionalType, IndexEntry, JumpTarget, StateIndex, SymbolRecord};
pub use session::{IndexMode, IndexSession};
pub use store::{ProjectSnapshot, ProjectStore};
pub use walker::{walk_tree, walk_tree_blocking, WalkOptions};
pub use watcher::{StateWatcher, WatcherConfig};
