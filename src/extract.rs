//! Symbol extraction from state-tree source files
//!
//! Extraction is line-oriented pattern matching, not parsing: a line that
//! declares exactly one `export const lowerCamelName` yields one
//! [`SymbolRecord`]. Lines with several candidate declarations are skipped
//! because there is no reliable way to tell which one the line is "about".

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::classify_path;
use crate::error::{Result, TangerineError};
use crate::schema::SymbolRecord;

/// Default name of the state directory below a project root
pub const DEFAULT_STATE_DIR: &str = "state";

/// `export const name` where `name` is lower camel case (at least two chars)
static EXPORT_CONST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+const\s+([a-z][A-Za-z0-9]+)\b").expect("valid declaration pattern")
});

/// Outcome of matching a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch<'a> {
    None,
    Single(&'a str),
    /// More than one declaration on the line; excluded from results
    Ambiguous(usize),
}

/// Match one line against the exported-declaration pattern
pub fn match_line(line: &str) -> LineMatch<'_> {
    let mut names = EXPORT_CONST
        .captures_iter(line)
        .filter_map(|c| c.get(1).map(|m| m.as_str()));

    let Some(first) = names.next() else {
        return LineMatch::None;
    };
    match names.count() {
        0 => LineMatch::Single(first),
        extra => LineMatch::Ambiguous(extra + 1),
    }
}

/// Per-file extraction seam used by the tree walker
///
/// Implementations must be pure with respect to their inputs. Closures of
/// the right shape implement this trait, which keeps tests short.
pub trait Extractor: Send + Sync {
    fn extract(&self, path: &Path, content: &str) -> Vec<SymbolRecord>;
}

impl<F> Extractor for F
where
    F: Fn(&Path, &str) -> Vec<SymbolRecord> + Send + Sync,
{
    fn extract(&self, path: &Path, content: &str) -> Vec<SymbolRecord> {
        self(path, content)
    }
}

/// Extracts exported declarations and classifies them by path
#[derive(Debug, Clone)]
pub struct SymbolExtractor {
    /// Name of the state directory (used when `state_root` does not contain the file)
    state_dir: String,
    /// Exact state root, when known
    state_root: Option<PathBuf>,
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_DIR)
    }
}

impl SymbolExtractor {
    pub fn new(state_dir: impl Into<String>) -> Self {
        Self {
            state_dir: state_dir.into(),
            state_root: None,
        }
    }

    /// Classify relative to an exact state root instead of searching the path
    pub fn with_state_root(mut self, state_root: impl Into<PathBuf>) -> Self {
        self.state_root = Some(state_root.into());
        self
    }

    pub fn state_root(&self) -> Option<&Path> {
        self.state_root.as_deref()
    }

    /// Extract records from already-loaded file content
    pub fn extract_source(&self, path: &Path, content: &str) -> Vec<SymbolRecord> {
        let (functional_type, context) =
            classify_path(path, self.state_root.as_deref(), &self.state_dir);

        let mut records = Vec::new();
        for (line_number, line) in content.lines().enumerate() {
            match match_line(line) {
                LineMatch::Single(name) => {
                    tracing::debug!(
                        "Found {} '{}' at {}:{}",
                        functional_type,
                        name,
                        path.display(),
                        line_number
                    );
                    records.push(SymbolRecord::new(
                        name,
                        path,
                        line_number,
                        functional_type,
                        context.clone(),
                    ));
                }
                LineMatch::Ambiguous(count) => {
                    tracing::debug!(
                        "Skipping ambiguous line {}:{} ({} declarations)",
                        path.display(),
                        line_number,
                        count
                    );
                }
                LineMatch::None => {}
            }
        }
        records
    }

    /// Read and extract a file; an unreadable file yields no records
    pub fn extract_file(&self, path: &Path) -> Vec<SymbolRecord> {
        match read_source(path) {
            Ok(content) => self.extract_source(path, &content),
            Err(e) => {
                tracing::debug!("Skipping {}", e);
                Vec::new()
            }
        }
    }
}

impl Extractor for SymbolExtractor {
    fn extract(&self, path: &Path, content: &str) -> Vec<SymbolRecord> {
        self.extract_source(path, content)
    }
}

/// Read a file as text, replacing invalid UTF-8 rather than failing
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| unreadable(path, e))
}

/// Async counterpart of [`read_source`]
pub async fn read_source_async(path: &Path) -> Result<String> {
    tokio::fs::read(path)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| unreadable(path, e))
}

fn unreadable(path: &Path, e: std::io::Error) -> TangerineError {
    TangerineError::UnreadableFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
