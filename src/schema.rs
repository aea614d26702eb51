//! Index data model: flat symbol records and the hierarchical entry tree

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Functional category a symbol is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FunctionalType {
    Actions,
    Reducers,
    Selectors,
    /// No type token found in the path
    #[default]
    Unknown,
}

impl FunctionalType {
    /// The three categories shown in the index, in display order
    pub const INDEXED: [FunctionalType; 3] = [Self::Actions, Self::Reducers, Self::Selectors];

    /// Get the string representation (also the path token it is inferred from)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actions => "actions",
            Self::Reducers => "reducers",
            Self::Selectors => "selectors",
            Self::Unknown => "unknown",
        }
    }

    /// Category label used for the top-level index entry
    pub fn label(&self) -> &'static str {
        match self {
            Self::Actions => "Actions",
            Self::Reducers => "Reducers",
            Self::Selectors => "Selectors",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FunctionalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol's declaration site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JumpTarget {
    pub file: PathBuf,
    /// Zero-based line offset
    pub line: usize,
}

impl JumpTarget {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for JumpTarget {
    /// Editor-style `file:line` with a one-based line number
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line + 1)
    }
}

/// One exported declaration found in the state tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Identifier of the exported symbol
    pub name: String,
    /// Absolute path of the declaring file
    pub source_file: PathBuf,
    /// Zero-based line of the declaration
    pub line_number: usize,
    pub functional_type: FunctionalType,
    /// Dotted namespace from the directories between the type directory and the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl SymbolRecord {
    pub fn new(
        name: impl Into<String>,
        source_file: impl Into<PathBuf>,
        line_number: usize,
        functional_type: FunctionalType,
        context: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_file: source_file.into(),
            line_number,
            functional_type,
            context,
        }
    }

    /// Where to navigate for this symbol
    pub fn jump_target(&self) -> JumpTarget {
        JumpTarget::new(self.source_file.clone(), self.line_number)
    }

    /// Check whether this record was declared at the given site
    pub fn is_declared_at(&self, file: &Path, line: usize) -> bool {
        self.source_file == file && self.line_number == line
    }
}

/// A node in the navigable index tree
///
/// Categories and context groups carry `children`; symbol leaves carry a
/// `target`. An entry with neither is an empty category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<IndexEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<JumpTarget>,
}

impl IndexEntry {
    /// Create a category or context group entry
    pub fn group(label: impl Into<String>, children: Vec<IndexEntry>) -> Self {
        Self {
            label: label.into(),
            children: Some(children),
            target: None,
        }
    }

    /// Create a leaf entry for a symbol
    pub fn leaf(record: &SymbolRecord) -> Self {
        Self {
            label: record.name.clone(),
            children: None,
            target: Some(record.jump_target()),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.target.is_some()
    }

    /// Direct children, empty for leaves
    pub fn children(&self) -> &[IndexEntry] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Find a direct child by label
    pub fn child(&self, label: &str) -> Option<&IndexEntry> {
        self.children().iter().find(|c| c.label == label)
    }

    /// All leaf entries below this one, depth-first
    pub fn leaves(&self) -> Vec<&IndexEntry> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// Number of symbol leaves below this entry
    pub fn symbol_count(&self) -> usize {
        self.leaves().len()
    }
}

fn collect_leaves<'a>(entry: &'a IndexEntry, out: &mut Vec<&'a IndexEntry>) {
    if entry.is_leaf() {
        out.push(entry);
        return;
    }
    for child in entry.children() {
        collect_leaves(child, out);
    }
}

/// The three top-level categories of a project's state index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateIndex {
    pub actions: IndexEntry,
    pub reducers: IndexEntry,
    pub selectors: IndexEntry,
}

impl StateIndex {
    /// Index with three empty categories
    pub fn empty() -> Self {
        Self {
            actions: IndexEntry::group(FunctionalType::Actions.label(), Vec::new()),
            reducers: IndexEntry::group(FunctionalType::Reducers.label(), Vec::new()),
            selectors: IndexEntry::group(FunctionalType::Selectors.label(), Vec::new()),
        }
    }

    /// Category entry for a type; `Unknown` has no category
    pub fn get(&self, ty: FunctionalType) -> Option<&IndexEntry> {
        match ty {
            FunctionalType::Actions => Some(&self.actions),
            FunctionalType::Reducers => Some(&self.reducers),
            FunctionalType::Selectors => Some(&self.selectors),
            FunctionalType::Unknown => None,
        }
    }

    /// Top-level entries in display order
    pub fn entries(&self) -> [&IndexEntry; 3] {
        [&self.actions, &self.reducers, &self.selectors]
    }

    pub fn symbol_count(&self) -> usize {
        self.entries().iter().map(|e| e.symbol_count()).sum()
    }
}

impl Default for StateIndex {
    fn default() -> Self {
        Self::empty()
    }
}
