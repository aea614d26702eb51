//! Tests for the `index` CLI command

use crate::common::{assert_json_type, assert_valid_json, json_leaf_labels, TestRepo};

// ============================================================================
// JSON OUTPUT
// ============================================================================

#[test]
fn test_index_json_structure() {
    let repo = TestRepo::state_project();
    let output = repo.run_cli_success(&["index", "app", "-f", "json"]);
    let json = assert_valid_json(&output, "index");

    assert_json_type(&json, "state_index");
    assert_eq!(json["mode"], "indexed");
    assert_eq!(json["symbol_count"], 8);
    assert_eq!(json["record_count"], 8);

    let index = &json["index"];
    assert_eq!(index["actions"]["label"], "Actions");
    assert_eq!(index["reducers"]["label"], "Reducers");
    assert_eq!(index["selectors"]["label"], "Selectors");
    assert_eq!(
        json_leaf_labels(&index["actions"]),
        vec!["resetAll", "fetchItems", "loginUser", "logoutUser"]
    );
}

#[test]
fn test_index_from_file_inside_project() {
    let repo = TestRepo::state_project();
    let output = repo.run_cli_success(&["index", "app/components/App.jsx", "--format", "json"]);
    let json = assert_valid_json(&output, "index from file");
    assert_eq!(json["symbol_count"], 8);
}

#[test]
fn test_index_leaf_targets_are_zero_based() {
    let repo = TestRepo::state_project();
    let output = repo.run_cli_success(&["index", "app", "-f", "json"]);
    let json = assert_valid_json(&output, "index targets");

    let reset = &json["index"]["actions"]["children"][0];
    assert_eq!(reset["label"], "resetAll");
    assert_eq!(reset["target"]["line"], 2);
    assert!(reset["target"]["file"]
        .as_str()
        .unwrap()
        .replace('\\', "/")
        .ends_with("app/state/actions/base.js"));
}

#[test]
fn test_index_with_filter() {
    let repo = TestRepo::state_project();
    let output = repo.run_cli_success(&["index", "app", "--filter", "fetch", "-f", "json"]);
    let json = assert_valid_json(&output, "filtered index");

    assert_eq!(json["mode"], "filtered");
    assert_eq!(json["filter"], "fetch");
    assert_eq!(json["record_count"], 8);
    assert!(json_leaf_labels(&json["index"]["actions"]).contains(&"fetchItems".to_string()));
    assert!(json_leaf_labels(&json["index"]["reducers"]).is_empty());
}

#[test]
fn test_index_flat_records() {
    let repo = TestRepo::state_project();
    let output = repo.run_cli_success(&["index", "app", "--flat", "-f", "json"]);
    let json = assert_valid_json(&output, "flat index");

    let records = json["records"].as_array().unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records[0]["name"], "resetAll");
    assert_eq!(records[0]["functional_type"], "actions");
    assert!(records[0].get("context").is_none());
    assert_eq!(records[1]["context"], "items");
}

// ============================================================================
// TEXT OUTPUT
// ============================================================================

#[test]
fn test_index_text_tree() {
    let repo = TestRepo::state_project();
    let output = repo.run_cli_success(&["index", "app"]);

    assert!(output.contains("Actions (4)"), "{}", output);
    assert!(output.contains("Reducers (2)"), "{}", output);
    assert!(output.contains("Selectors (2)"), "{}", output);
    assert!(output.contains("├── resetAll  state/actions/base.js:3"), "{}", output);
    assert!(output.contains("└── user"), "{}", output);
}

#[test]
fn test_index_empty_state_dir() {
    let repo = TestRepo::new();
    repo.add_dir("app/state");
    let output = repo.run_cli_success(&["index", "app"]);
    assert!(output.contains("Actions (0)"));
    assert!(output.contains("(empty)"));
}
