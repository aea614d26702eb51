//! Project root resolution
//!
//! A project root is the nearest directory, starting from a file's parent
//! (or from a directory itself), that directly contains the state directory.

use std::path::{Path, PathBuf};

use crate::error::{Result, TangerineError};
use crate::paths::resolve_path_or_cwd;

/// Find the project root that owns `path`.
///
/// Returns `ProjectNotFound` when no ancestor contains `state_dir`. The
/// filesystem root is checked too.
pub fn resolve_project_root(path: &Path, state_dir: &str) -> Result<PathBuf> {
    let absolute = resolve_path_or_cwd(path)?;
    let start = if absolute.is_dir() {
        absolute.as_path()
    } else {
        match absolute.parent() {
            Some(parent) => parent,
            None => absolute.as_path(),
        }
    };

    for candidate in start.ancestors() {
        if is_project_root(candidate, state_dir) {
            tracing::debug!(
                "Resolved project root {} for {}",
                candidate.display(),
                path.display()
            );
            return Ok(candidate.to_path_buf());
        }
    }

    Err(TangerineError::ProjectNotFound { path: absolute })
}

/// Whether `dir` directly contains a `state_dir` directory
pub fn is_project_root(dir: &Path, state_dir: &str) -> bool {
    dir.join(state_dir).is_dir()
}
