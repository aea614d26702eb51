//! CLI argument definitions using clap with subcommand architecture
//!
//! The CLI is a thin adapter over the library: every subcommand maps onto one
//! engine operation and prints its result as text or JSON.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Index and search the state tree of a front-end project
#[derive(Parser, Debug)]
#[command(name = "tangerine")]
#[command(about = "Index actions, reducers and selectors of a project's state directory")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (applies to all commands)
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (overrides project and user config)
    #[arg(long, global = true, value_name = "FILE", env = "TANGERINE_CONFIG")]
    pub config: Option<PathBuf>,
}

// ============================================
// Main Commands Enum
// ============================================

/// Available subcommands for tangerine
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and print the state index of a project
    #[command(visible_alias = "i")]
    Index(IndexArgs),

    /// Fuzzy search exported state symbols
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Print the declaration site of the best match
    #[command(visible_alias = "j")]
    Jump(JumpArgs),

    /// Print the project root that owns a path
    Root(RootArgs),

    /// Rebuild the index whenever the state directory changes
    #[command(visible_alias = "w")]
    Watch(WatchArgs),
}

// ============================================
// Subcommand Arguments
// ============================================

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Any file or directory inside the project (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Re-group the index through a fuzzy filter
    #[arg(long, value_name = "QUERY")]
    pub filter: Option<String>,

    /// Print the flat record list instead of the tree
    #[arg(long)]
    pub flat: bool,
}

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query; whitespace separates tokens
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Any file or directory inside the project (default: current directory)
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Tolerance from 0.0 (exact) to 1.0 (anything)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the jump command
#[derive(Args, Debug)]
pub struct JumpArgs {
    /// Free-text query; whitespace separates tokens
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Any file or directory inside the project (default: current directory)
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Arguments for the root command
#[derive(Args, Debug)]
pub struct RootArgs {
    /// File or directory to resolve (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Any file or directory inside the project (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Keep the index filtered by this query across rebuilds
    #[arg(long, value_name = "QUERY")]
    pub filter: Option<String>,

    /// Debounce window in milliseconds (overrides config)
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

// ============================================
// Output Format
// ============================================

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    #[value(alias = "pretty")]
    Text,
    /// JSON for machine parsing
    Json,
}
