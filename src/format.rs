//! Text and JSON rendering of indexes, records and jump targets

use std::path::Path;

use serde::Serialize;

use crate::error::{Result, TangerineError};
use crate::schema::{IndexEntry, StateIndex, SymbolRecord};

/// Pretty JSON for any serializable value
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        TangerineError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("JSON serialization failed: {}", e),
        ))
    })
}

/// Render the index as a tree.
///
/// Leaves show their declaration site relative to `base` when given.
///
/// ```text
/// Actions (2)
/// ├── resetAll  state/actions/base.js:1
/// └── user
///     └── loginUser  state/actions/user/login.js:3
/// ```
pub fn render_index(index: &StateIndex, base: Option<&Path>) -> String {
    let mut out = String::new();
    for entry in index.entries() {
        out.push_str(&format!("{} ({})\n", entry.label, entry.symbol_count()));
        let children = entry.children();
        if children.is_empty() {
            out.push_str("    (empty)\n");
        }
        for (i, child) in children.iter().enumerate() {
            render_entry(child, "", i + 1 == children.len(), base, &mut out);
        }
    }
    out
}

fn render_entry(entry: &IndexEntry, prefix: &str, last: bool, base: Option<&Path>, out: &mut String) {
    let branch = if last { "└── " } else { "├── " };
    match &entry.target {
        Some(target) => out.push_str(&format!(
            "{}{}{}  {}:{}\n",
            prefix,
            branch,
            entry.label,
            display_path(&target.file, base),
            target.line + 1
        )),
        None => out.push_str(&format!("{}{}{}\n", prefix, branch, entry.label)),
    }

    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    let children = entry.children();
    for (i, child) in children.iter().enumerate() {
        render_entry(child, &child_prefix, i + 1 == children.len(), base, out);
    }
}

/// One line per record: `name (type[, context])  file:line`
pub fn render_records(records: &[SymbolRecord], base: Option<&Path>) -> String {
    if records.is_empty() {
        return "(no matches)\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        let kind = match &record.context {
            Some(context) => format!("{}, {}", record.functional_type, context),
            None => record.functional_type.to_string(),
        };
        out.push_str(&format!(
            "• {} ({})  {}:{}\n",
            record.name,
            kind,
            display_path(&record.source_file, base),
            record.line_number + 1
        ));
    }
    out
}

fn display_path(path: &Path, base: Option<&Path>) -> String {
    base.and_then(|b| path.strip_prefix(b).ok())
        .unwrap_or(path)
        .display()
        .to_string()
        .replace('\\', "/")
}
