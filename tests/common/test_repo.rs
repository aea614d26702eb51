//! TestRepo builder for integration testing
//!
//! Creates a project tree in a temp directory and runs the `tangerine`
//! binary against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use tempfile::TempDir;

/// Builder for temporary projects with a state directory
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test repository
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Standard project under `app/`:
    ///
    /// ```text
    /// app/
    /// ├── components/App.jsx
    /// └── state/
    ///     ├── actions/base.js          resetAll
    ///     ├── actions/items/fetch.js   fetchItems
    ///     ├── actions/user/login.js    loginUser, logoutUser
    ///     ├── reducers.js              userReducer, itemsReducer
    ///     └── selectors.js             getUser, getItems
    /// ```
    pub fn state_project() -> Self {
        let repo = Self::new();
        repo.add_exports("app/state/actions/base.js", &["resetAll"])
            .add_exports("app/state/actions/items/fetch.js", &["fetchItems"])
            .add_exports("app/state/actions/user/login.js", &["loginUser", "logoutUser"])
            .add_exports("app/state/reducers.js", &["userReducer", "itemsReducer"])
            .add_exports("app/state/selectors.js", &["getUser", "getItems"])
            .add_file(
                "app/components/App.jsx",
                "export default function App() { return null; }\n",
            );
        repo
    }

    /// Get the path to the test repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Root of the standard project
    pub fn project_root(&self) -> PathBuf {
        self.path().join("app")
    }

    /// Absolute path of a repo-relative file
    pub fn file(&self, relative_path: &str) -> PathBuf {
        self.path().join(relative_path)
    }

    /// Add a file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Add an empty file
    pub fn add_empty_file(&self, relative_path: &str) -> &Self {
        self.add_file(relative_path, "")
    }

    /// Add an empty directory
    pub fn add_dir(&self, relative_path: &str) -> &Self {
        fs::create_dir_all(self.dir.path().join(relative_path)).expect("Failed to create dir");
        self
    }

    /// Add a file with one `export const` arrow function per name
    pub fn add_exports(&self, relative_path: &str, names: &[&str]) -> &Self {
        let mut content = String::from("import { api } from '../api';\n\n");
        for name in names {
            content.push_str(&format!("export const {} = (payload) => api(payload);\n", name));
        }
        self.add_file(relative_path, &content)
    }

    /// Run the tangerine CLI from the repo root, isolated from user config
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(env!("CARGO_BIN_EXE_tangerine"))
            .current_dir(self.path())
            .args(args)
            .env("XDG_CONFIG_HOME", self.path().join(".xdg"))
            .env("HOME", self.path())
            .env_remove("TANGERINE_CONFIG")
            .env_remove("RUST_LOG")
            .output()
    }

    /// Start a long-running CLI command with stdout piped
    pub fn spawn_cli(&self, args: &[&str]) -> Child {
        Command::new(env!("CARGO_BIN_EXE_tangerine"))
            .current_dir(self.path())
            .args(args)
            .env("XDG_CONFIG_HOME", self.path().join(".xdg"))
            .env("HOME", self.path())
            .env_remove("TANGERINE_CONFIG")
            .env_remove("RUST_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn CLI")
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (Option<i32>, String) {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            !output.status.success(),
            "CLI command {:?} should have failed",
            args
        );
        (
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
