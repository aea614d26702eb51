//! Custom assertions for integration tests

use std::path::Path;

use serde_json::Value;
use tangerine_engine::{IndexEntry, StateIndex};

/// Assert that output is valid JSON and return parsed value
pub fn assert_valid_json(output: &str, context: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!(
            "Expected valid JSON ({}): {}\nOutput:\n{}",
            context, e, output
        )
    })
}

/// Assert that JSON output has expected type
pub fn assert_json_type(json: &Value, expected_type: &str) {
    let actual_type = json["_type"]
        .as_str()
        .unwrap_or_else(|| panic!("JSON missing '_type' field"));
    assert_eq!(
        actual_type, expected_type,
        "Expected JSON type '{}' but got '{}'",
        expected_type, actual_type
    );
}

/// Labels of an entry's direct children
pub fn child_labels(entry: &IndexEntry) -> Vec<String> {
    entry.children().iter().map(|c| c.label.clone()).collect()
}

/// Labels of every symbol leaf in the index
pub fn all_leaf_labels(index: &StateIndex) -> Vec<String> {
    index
        .entries()
        .iter()
        .flat_map(|e| e.leaves())
        .map(|leaf| leaf.label.clone())
        .collect()
}

/// Assert that two paths name the same file, tolerating symlinked temp dirs
pub fn assert_same_path(actual: &Path, expected: &Path) {
    let canon = |p: &Path| p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
    assert_eq!(
        canon(actual),
        canon(expected),
        "paths differ: {} vs {}",
        actual.display(),
        expected.display()
    );
}

/// Leaf labels of a JSON index entry, depth-first
pub fn json_leaf_labels(entry: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_json_leaves(entry, &mut out);
    out
}

fn collect_json_leaves(entry: &Value, out: &mut Vec<String>) {
    if entry.get("target").is_some() {
        if let Some(label) = entry["label"].as_str() {
            out.push(label.to_string());
        }
        return;
    }
    if let Some(children) = entry["children"].as_array() {
        for child in children {
            collect_json_leaves(child, out);
        }
    }
}
