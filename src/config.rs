//! Tangerine configuration management.
//!
//! Configuration is looked up in this order:
//! 1. An explicit path (`--config`)
//! 2. `<project>/.tangerine.toml`
//! 3. The user config file:
//!    - Linux: `$XDG_CONFIG_HOME/tangerine/config.toml` (`~/.config/tangerine/config.toml`)
//!    - macOS: `~/Library/Application Support/tangerine/config.toml`
//!    - Windows: `%APPDATA%\tangerine\config.toml`
//! 4. Built-in defaults
//!
//! Every section and field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TangerineError};
use crate::extract::DEFAULT_STATE_DIR;
use crate::walker::WalkOptions;

/// File name of the per-project configuration
pub const PROJECT_CONFIG_FILE: &str = ".tangerine.toml";

/// Tangerine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TangerineConfig {
    /// Indexing settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Fuzzy search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// File watching settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// Name of the state directory below a project root
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Skip files ignored by .gitignore/.ignore
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Index dot-files and dot-directories
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Only index these extensions (empty = every file)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Maximum directory depth below the state root
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Files read concurrently during an async walk
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,
}

fn default_state_dir() -> String {
    DEFAULT_STATE_DIR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent_reads() -> usize {
    64
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            respect_gitignore: false,
            include_hidden: true,
            extensions: Vec::new(),
            max_depth: None,
            max_concurrent_reads: default_max_concurrent_reads(),
        }
    }
}

impl IndexConfig {
    /// Walker options derived from this configuration
    pub fn walk_options(&self) -> WalkOptions {
        let mut options = WalkOptions::new()
            .with_gitignore(self.respect_gitignore)
            .with_hidden(self.include_hidden)
            .with_extensions(self.extensions.clone())
            .with_max_concurrent_reads(self.max_concurrent_reads);
        if let Some(depth) = self.max_depth {
            options = options.with_max_depth(depth);
        }
        options
    }
}

/// Fuzzy search configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Tolerance for search-and-group filtering (0.0 exact .. 1.0 anything)
    #[serde(default = "default_search_threshold")]
    pub search_threshold: f64,

    /// Tolerance for jump-to-best-match
    #[serde(default = "default_jump_threshold")]
    pub jump_threshold: f64,

    /// Maximum number of search results (None = unlimited)
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_search_threshold() -> f64 {
    crate::fuzzy::SEARCH_THRESHOLD
}

fn default_jump_threshold() -> f64 {
    crate::fuzzy::JUMP_THRESHOLD
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_threshold: default_search_threshold(),
            jump_threshold: default_jump_threshold(),
            limit: None,
        }
    }
}

/// File watching configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    /// Debounce window for change events, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TangerineConfig {
    /// Load configuration from a specific path (missing file = defaults)
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| TangerineError::ConfigError {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration that applies to a project
    pub fn load_for_project(project_root: Option<&Path>) -> Result<Self> {
        if let Some(root) = project_root {
            let project_file = root.join(PROJECT_CONFIG_FILE);
            if project_file.is_file() {
                tracing::debug!("Using project config {}", project_file.display());
                return Self::load_from(&project_file);
            }
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Using user config {}", path.display());
                Self::load_from(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Path of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tangerine").join("config.toml"))
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        crate::fuzzy::validate_threshold(self.search.search_threshold)?;
        crate::fuzzy::validate_threshold(self.search.jump_threshold)?;

        let state_dir = self.index.state_dir.trim();
        if state_dir.is_empty() || state_dir.contains(['/', '\\']) {
            return Err(TangerineError::ConfigError {
                message: format!(
                    "index.state_dir must be a single directory name, got '{}'",
                    self.index.state_dir
                ),
            });
        }
        if self.index.max_concurrent_reads == 0 {
            return Err(TangerineError::ConfigError {
                message: "index.max_concurrent_reads must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
