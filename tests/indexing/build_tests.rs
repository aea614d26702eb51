//! Tests for index building over real state trees

use std::collections::HashSet;

use tangerine_engine::{
    build_index, resolve_project_root, FunctionalType, IndexConfig, StateIndex,
    StateIndexBuilder, TangerineError,
};

use crate::common::{all_leaf_labels, child_labels, TestRepo};

// ============================================================================
// SHAPE
// ============================================================================

#[tokio::test]
async fn test_three_categories_for_standard_project() {
    let repo = TestRepo::state_project();
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;

    let labels: Vec<&str> = index.entries().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Actions", "Reducers", "Selectors"]);
    assert_eq!(index.symbol_count(), 8);
}

#[tokio::test]
async fn test_three_categories_when_only_one_type_exists() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/selectors/user.js", &["getUser"]);
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;

    assert_eq!(index.entries().len(), 3);
    assert!(index.actions.children().is_empty());
    assert!(index.reducers.children().is_empty());
    assert_eq!(index.selectors.symbol_count(), 1);
}

#[tokio::test]
async fn test_empty_state_directory_gives_empty_categories() {
    let repo = TestRepo::new();
    repo.add_dir("app/state");
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;
    assert_eq!(index, StateIndex::empty());
}

#[tokio::test]
async fn test_build_is_idempotent() {
    let repo = TestRepo::state_project();
    let config = IndexConfig::default();
    let first = build_index(&repo.project_root(), &config).await;
    let second = build_index(&repo.project_root(), &config).await;
    assert_eq!(first, second);
}

// ============================================================================
// GROUPING
// ============================================================================

#[tokio::test]
async fn test_actions_grouped_by_context_in_walk_order() {
    let repo = TestRepo::state_project();
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;

    assert_eq!(child_labels(&index.actions), vec!["resetAll", "items", "user"]);
    let user = index.actions.child("user").unwrap();
    assert_eq!(child_labels(user), vec!["loginUser", "logoutUser"]);
    assert_eq!(
        child_labels(&index.reducers),
        vec!["userReducer", "itemsReducer"]
    );
}

#[tokio::test]
async fn test_context_less_leaves_precede_groups() {
    let repo = TestRepo::new();
    // `zzz.js` sorts after the `user` directory but is still listed first
    repo.add_exports("app/state/actions/user/login.js", &["loginUser"])
        .add_exports("app/state/actions/zzz.js", &["resetAll"]);
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;

    let children = index.actions.children();
    assert_eq!(children[0].label, "resetAll");
    assert!(children[0].is_leaf());
    assert_eq!(children[1].label, "user");
    assert!(!children[1].is_leaf());
}

#[tokio::test]
async fn test_each_context_appears_once_per_type() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/actions/user/login.js", &["loginUser"])
        .add_exports("app/state/actions/user/profile.js", &["saveProfile"])
        .add_exports("app/state/actions/cart/add.js", &["addToCart"])
        .add_exports("app/state/actions/user/session.js", &["refreshSession"]);
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;

    let labels = child_labels(&index.actions);
    let unique: HashSet<&String> = labels.iter().collect();
    assert_eq!(labels.len(), unique.len());
    assert_eq!(labels, vec!["cart", "user"]);
    assert_eq!(
        child_labels(index.actions.child("user").unwrap()),
        vec!["loginUser", "saveProfile", "refreshSession"]
    );
}

#[tokio::test]
async fn test_deep_context_is_dotted() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/selectors/user/profile/avatar.js", &["getAvatar"]);
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;
    assert_eq!(child_labels(&index.selectors), vec!["user.profile"]);
}

// ============================================================================
// RECORDS
// ============================================================================

#[tokio::test]
async fn test_nested_action_record() {
    let repo = TestRepo::new();
    repo.add_file(
        "app/state/actions/user/login.js",
        "export const loginUser = (credentials) => ({ type: 'LOGIN', credentials });\n",
    );
    let builder = StateIndexBuilder::new(repo.project_root(), &IndexConfig::default());
    let records = builder.records().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "loginUser");
    assert_eq!(records[0].functional_type, FunctionalType::Actions);
    assert_eq!(records[0].context.as_deref(), Some("user"));
    assert_eq!(records[0].line_number, 0);
    assert_eq!(
        records[0].source_file,
        repo.file("app/state/actions/user/login.js")
    );
}

#[tokio::test]
async fn test_flat_selectors_record() {
    let repo = TestRepo::new();
    repo.add_file(
        "app/state/selectors.js",
        "export const getUser = (state) => state.user;\n",
    );
    let builder = StateIndexBuilder::new(repo.project_root(), &IndexConfig::default());
    let records = builder.records().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "getUser");
    assert_eq!(records[0].functional_type, FunctionalType::Selectors);
    assert_eq!(records[0].context, None);
}

#[tokio::test]
async fn test_leaf_targets_round_trip_to_records() {
    let repo = TestRepo::state_project();
    let builder = StateIndexBuilder::new(repo.project_root(), &IndexConfig::default());
    let records = builder.records().await;
    let index = builder.build().await;

    for category in index.entries() {
        for leaf in category.leaves() {
            let target = leaf.target.as_ref().unwrap();
            assert!(
                records
                    .iter()
                    .any(|r| r.name == leaf.label && r.is_declared_at(&target.file, target.line)),
                "leaf {} has no matching record",
                leaf.label
            );
        }
    }
    assert_eq!(all_leaf_labels(&index).len(), records.len());
}

#[tokio::test]
async fn test_ambiguous_line_is_excluded() {
    let repo = TestRepo::new();
    repo.add_file(
        "app/state/reducers.js",
        "export const aReducer = 1; export const bReducer = 2;\nexport const userReducer = () => {};\n",
    );
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;
    assert_eq!(child_labels(&index.reducers), vec!["userReducer"]);
}

#[tokio::test]
async fn test_directory_and_flat_file_of_same_type_both_indexed() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/actions/user.js", &["loginUser"])
        .add_exports("app/state/actions.js", &["resetAll"]);
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;

    let mut labels = child_labels(&index.actions);
    labels.sort();
    assert_eq!(labels, vec!["loginUser", "resetAll"]);
}

#[tokio::test]
async fn test_unknown_symbols_are_not_categorized() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/helpers.js", &["formatDate"])
        .add_exports("app/state/actions/base.js", &["resetAll"]);
    let builder = StateIndexBuilder::new(repo.project_root(), &IndexConfig::default());

    let records = builder.records().await;
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .any(|r| r.name == "formatDate" && r.functional_type == FunctionalType::Unknown));

    let index = builder.build().await;
    assert!(!all_leaf_labels(&index).contains(&"formatDate".to_string()));
}

#[tokio::test]
async fn test_nested_directory_named_state_is_a_context() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/selectors/state/misc.js", &["getMisc"]);
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;
    assert_eq!(child_labels(&index.selectors), vec!["state"]);
}

#[tokio::test]
async fn test_non_utf8_file_is_read_lossily() {
    let repo = TestRepo::new();
    repo.add_dir("app/state");
    std::fs::write(
        repo.file("app/state/selectors.js"),
        b"// caf\xe9\nexport const getUser = 1;\n",
    )
    .unwrap();
    let index = build_index(&repo.project_root(), &IndexConfig::default()).await;
    assert_eq!(child_labels(&index.selectors), vec!["getUser"]);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[tokio::test]
async fn test_custom_state_dir() {
    let repo = TestRepo::new();
    repo.add_exports("web/store/actions/user.js", &["loginUser"]);
    let config = IndexConfig {
        state_dir: "store".to_string(),
        ..IndexConfig::default()
    };

    let root = resolve_project_root(&repo.file("web/store/actions/user.js"), "store").unwrap();
    let index = build_index(&root, &config).await;
    assert_eq!(child_labels(&index.actions), vec!["loginUser"]);
}

#[tokio::test]
async fn test_gitignore_respected_only_when_enabled() {
    let repo = TestRepo::new();
    repo.add_file("app/state/.gitignore", "generated/\n")
        .add_exports("app/state/actions/generated/api.js", &["fetchGenerated"])
        .add_exports("app/state/actions/user.js", &["loginUser"]);

    let default = build_index(&repo.project_root(), &IndexConfig::default()).await;
    assert_eq!(default.actions.symbol_count(), 2);

    let config = IndexConfig {
        respect_gitignore: true,
        ..IndexConfig::default()
    };
    let filtered = build_index(&repo.project_root(), &config).await;
    assert_eq!(child_labels(&filtered.actions), vec!["loginUser"]);
}

#[tokio::test]
async fn test_extension_filter() {
    let repo = TestRepo::new();
    repo.add_exports("app/state/actions/user.ts", &["loginUser"])
        .add_exports("app/state/actions/user.js", &["logoutUser"]);
    let config = IndexConfig {
        extensions: vec!["ts".to_string()],
        ..IndexConfig::default()
    };
    let index = build_index(&repo.project_root(), &config).await;
    assert_eq!(child_labels(&index.actions), vec!["loginUser"]);
}

// ============================================================================
// LOCATOR
// ============================================================================

#[test]
fn test_locator_from_component_file() {
    let repo = TestRepo::state_project();
    let root = resolve_project_root(&repo.file("app/components/App.jsx"), "state").unwrap();
    assert_eq!(root, repo.project_root());
}

#[test]
fn test_locator_outside_project() {
    let repo = TestRepo::new();
    repo.add_file("notes/todo.txt", "");
    let file = repo.file("notes/todo.txt");
    // Guard against a temp dir that happens to live below a `state` parent
    let has_state_ancestor = file
        .ancestors()
        .skip(1)
        .any(|dir| dir.join("state").is_dir());
    if !has_state_ancestor {
        assert!(matches!(
            resolve_project_root(&file, "state"),
            Err(TangerineError::ProjectNotFound { .. })
        ));
    }
}
