//! Tests for the `watch` CLI command

use std::io::{BufRead, BufReader};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::common::{assert_json_type, TestRepo};

/// Stream stdout lines of a child process over a channel
fn line_channel(stdout: std::process::ChildStdout) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[test]
fn test_watch_rebuilds_after_state_change() {
    let repo = TestRepo::state_project();
    let mut child = repo.spawn_cli(&["watch", "app", "--debounce-ms", "50", "-f", "json"]);
    let lines = line_channel(child.stdout.take().unwrap());

    let first: Value = serde_json::from_str(
        &lines
            .recv_timeout(Duration::from_secs(20))
            .expect("no initial status line"),
    )
    .unwrap();
    assert_json_type(&first, "index_updated");
    assert_eq!(first["symbol_count"], 8);
    assert_eq!(first["changed_files"], 0);
    let initial_generation = first["generation"].as_u64().unwrap();

    repo.add_exports("app/state/actions/cart.js", &["addToCart"]);

    // A create and a write may land in separate batches; wait for the new symbol
    let deadline = Instant::now() + Duration::from_secs(20);
    let mut updated = None;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        let Ok(line) = lines.recv_timeout(remaining) else {
            break;
        };
        let json: Value = serde_json::from_str(&line).unwrap();
        if json["symbol_count"] == 9 {
            updated = Some(json);
            break;
        }
    }

    let _ = child.kill();
    let _ = child.wait();

    let updated = updated.expect("watch never reported the new symbol");
    assert_json_type(&updated, "index_updated");
    assert!(updated["generation"].as_u64().unwrap() > initial_generation);
    assert!(updated["changed_files"].as_u64().unwrap() >= 1);
}
