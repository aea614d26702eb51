//! Command modules for the tangerine CLI
//!
//! Each command module implements a single top-level command:
//! - `index` - Build and print a project's state index
//! - `search` - Fuzzy search over the flat record list
//! - `jump` - Declaration site of the best strict match
//! - `root` - Resolve the project root of a path
//! - `watch` - Rebuild on state directory changes
//!
//! All command handlers take their respective `Args` struct from `cli.rs`
//! and a shared `CommandContext` for output format, verbosity and config.

pub mod index;
pub mod jump;
pub mod root;
pub mod search;
pub mod watch;

pub use index::run_index;
pub use jump::run_jump;
pub use root::run_root;
pub use search::run_search;
pub use watch::run_watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::config::TangerineConfig;
use crate::error::{Result, TangerineError};
use crate::locator::resolve_project_root;
use crate::paths::resolve_path;
use crate::session::IndexSession;
use crate::store::ProjectStore;

/// Shared context passed to all command handlers
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Output format (text or json)
    pub format: OutputFormat,
    /// Show verbose output
    pub verbose: bool,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Create a new CommandContext from CLI args
    pub fn from_cli(format: OutputFormat, verbose: bool, config_path: Option<PathBuf>) -> Self {
        Self {
            format,
            verbose,
            config_path,
        }
    }

    /// Configuration for a project (or the user/explicit config without one)
    pub fn load_config(&self, project_root: Option<&Path>) -> Result<TangerineConfig> {
        match &self.config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(TangerineError::ConfigError {
                        message: format!("config file {} not found", path.display()),
                    });
                }
                TangerineConfig::load_from(path)
            }
            None => TangerineConfig::load_for_project(project_root),
        }
    }

    /// Resolve the project that owns `path` and load its configuration
    pub fn resolve_project(&self, path: Option<&Path>) -> Result<ProjectContext> {
        let target = resolve_path(path)?;
        let base = self.load_config(None)?;
        let root = resolve_project_root(&target, &base.index.state_dir)?;
        let config = if self.config_path.is_some() {
            base
        } else {
            self.load_config(Some(&root))?
        };
        Ok(ProjectContext { root, config })
    }
}

/// A resolved project and the configuration that applies to it
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub config: TangerineConfig,
}

impl ProjectContext {
    /// Session over a private store, already pointed at this project
    pub async fn open_session(self) -> Result<IndexSession> {
        let session = IndexSession::new(Arc::new(ProjectStore::new()), Arc::new(self.config));
        session.on_active_document(&self.root).await;
        if session.snapshot().is_none() {
            return Err(TangerineError::ProjectNotFound { path: self.root });
        }
        Ok(session)
    }
}
