//! Error types and exit codes for tangerine-engine

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for tangerine-engine operations
///
/// Most of these are recovered locally: a missing project becomes the
/// `NoProject` state, an unreadable file is skipped by the walker. Only the
/// CLI turns them into process exit codes.
#[derive(Error, Debug)]
pub enum TangerineError {
    #[error("No project with a state directory found above {path}")]
    ProjectNotFound { path: PathBuf },

    #[error("Unreadable file {path}: {message}")]
    UnreadableFile { path: PathBuf, message: String },

    #[error("No symbol matches '{query}'")]
    NoFuzzyMatch { query: String },

    #[error("Threshold must be within 0.0..=1.0, got {value}")]
    InvalidThreshold { value: f64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Watcher error: {message}")]
    WatchError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TangerineError {
    /// Convert error to a process exit code:
    /// - 0: Success
    /// - 1: IO error / unreadable file
    /// - 2: Project not found
    /// - 3: No fuzzy match
    /// - 4: Configuration or threshold error
    /// - 5: Watcher failure
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io(_) | Self::UnreadableFile { .. } => ExitCode::from(1),
            Self::ProjectNotFound { .. } => ExitCode::from(2),
            Self::NoFuzzyMatch { .. } => ExitCode::from(3),
            Self::InvalidThreshold { .. } | Self::ConfigError { .. } => ExitCode::from(4),
            Self::WatchError { .. } => ExitCode::from(5),
        }
    }

    /// Whether this error describes an expected "nothing here" outcome
    /// rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. } | Self::NoFuzzyMatch { .. }
        )
    }
}

/// Result type alias for tangerine-engine operations
pub type Result<T> = std::result::Result<T, TangerineError>;
