//! Functional type and context inference from state-tree paths
//!
//! A file's position below the state root decides how its symbols are
//! grouped. Given the path segments below the root:
//!
//! ```text
//! state/actions/user/session/login.js  ->  ["actions", "user", "session", "login.js"]
//!                                           (Actions, Some("user.session"))
//! state/selectors.js                   ->  ["selectors.js"]
//!                                           (Selectors, None)
//! ```
//!
//! Precedence for the type:
//! 1. exact directory name (`actions/`, `reducers/`, `selectors/`)
//! 2. filename prefix, only for files directly in the state root
//!    (`actions.js`, `actionsHelpers.js`)
//! 3. `Unknown`
//!
//! The context is independent of the type: every directory between the
//! first segment and the file name, joined with `.`.

use std::path::{Component, Path};

use crate::schema::FunctionalType;

/// Type tokens checked against the first segment, in priority order
const TYPE_TOKENS: [FunctionalType; 3] = [
    FunctionalType::Selectors,
    FunctionalType::Reducers,
    FunctionalType::Actions,
];

/// Classify a file from its path segments below the state root.
pub fn classify<S: AsRef<str>>(segments: &[S]) -> (FunctionalType, Option<String>) {
    let Some(first) = segments.first().map(|s| s.as_ref()) else {
        return (FunctionalType::Unknown, None);
    };

    let functional_type = if segments.len() > 1 {
        type_from_directory(first)
    } else {
        type_from_file_name(first)
    };

    (functional_type, context_from_segments(segments))
}

/// Exact match of a directory name against the type tokens
pub fn type_from_directory(name: &str) -> FunctionalType {
    TYPE_TOKENS
        .into_iter()
        .find(|ty| ty.as_str() == name)
        .unwrap_or(FunctionalType::Unknown)
}

/// Prefix match of a file name against the type tokens
pub fn type_from_file_name(name: &str) -> FunctionalType {
    TYPE_TOKENS
        .into_iter()
        .find(|ty| name.starts_with(ty.as_str()))
        .unwrap_or(FunctionalType::Unknown)
}

/// Dotted namespace of the directories between the type segment and the file
pub fn context_from_segments<S: AsRef<str>>(segments: &[S]) -> Option<String> {
    if segments.len() <= 2 {
        return None;
    }
    let inner: Vec<&str> = segments[1..segments.len() - 1]
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .collect();
    if inner.is_empty() {
        None
    } else {
        Some(inner.join("."))
    }
}

/// Path segments of `path` below the state root.
///
/// When `state_root` is known and contains `path`, the segments are taken
/// relative to it. Otherwise the last component named `state_dir` is used as
/// the root. A path with no such component yields just its file name.
pub fn state_segments(path: &Path, state_root: Option<&Path>, state_dir: &str) -> Vec<String> {
    if let Some(root) = state_root {
        if let Ok(rel) = path.strip_prefix(root) {
            let segments = normal_segments(rel);
            if !segments.is_empty() {
                return segments;
            }
        }
    }

    let all = normal_segments(path);
    match all.iter().rposition(|s| s == state_dir) {
        Some(pos) if pos + 1 < all.len() => all[pos + 1..].to_vec(),
        _ => path
            .file_name()
            .map(|n| vec![n.to_string_lossy().into_owned()])
            .unwrap_or_default(),
    }
}

/// Classify a file path in one step
pub fn classify_path(
    path: &Path,
    state_root: Option<&Path>,
    state_dir: &str,
) -> (FunctionalType, Option<String>) {
    classify(&state_segments(path, state_root, state_dir))
}

fn normal_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
