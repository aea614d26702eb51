//! Path resolution shared by the CLI, the session and the store
//!
//! Every path that reaches the store is absolute and normalized, so two
//! spellings of the same project map to the same cache entry.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, TangerineError};

/// Resolve an optional CLI path, defaulting to the current working directory.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => resolve_path_or_cwd(p),
        None => current_dir(),
    }
}

/// Make `path` absolute by joining relative paths onto the current directory.
///
/// The result is lexically normalized; `.` and `..` components are folded
/// without touching the filesystem.
pub fn resolve_path_or_cwd(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        Ok(normalize_path(&current_dir()?.join(path)))
    }
}

/// Canonicalize for comparison, falling back to the normalized input when
/// the path does not exist.
pub fn canonicalize_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .map(|p| strip_verbatim(&p))
        .unwrap_or_else(|_| normalize_path(path))
}

/// Lexically remove `.` and `..` components.
///
/// `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                out.push(component)
            }
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Strip the Windows `\\?\` prefix that `canonicalize` adds
fn strip_verbatim(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let s = path.to_string_lossy();
        if let Some(stripped) = s.strip_prefix(r"\\?\UNC\") {
            return PathBuf::from(format!(r"\\{}", stripped));
        }
        if let Some(stripped) = s.strip_prefix(r"\\?\") {
            return PathBuf::from(stripped);
        }
    }
    path.to_path_buf()
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(TangerineError::Io)
}
