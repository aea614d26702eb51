//! Filesystem-driven save notifications
//!
//! Hosts without their own save events (the `tangerine watch` command) use a
//! [`StateWatcher`] on the project's state directory. Debounced change
//! batches arrive on a tokio channel and are fed to
//! [`IndexSession::on_save`](crate::session::IndexSession::on_save).
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌───────────┐
//! │   notify    │────>│  debouncer  │────>│ path filter  │────>│  mpsc rx  │
//! │   watcher   │     │ (debounce)  │     │ (ext/hidden) │     │ (session) │
//! └─────────────┘     └─────────────┘     └──────────────┘     └───────────┘
//! ```

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::config::TangerineConfig;
use crate::error::{Result, TangerineError};
use crate::paths::canonicalize_path;
use crate::walker::WalkOptions;

/// Configuration for the state watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce window (default: 200ms)
    pub debounce_duration: Duration,
    /// Report changes to dot-files
    pub include_hidden: bool,
    /// Extensions to report (empty = all)
    pub extensions: Vec<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_duration: Duration::from_millis(200),
            include_hidden: true,
            extensions: Vec::new(),
        }
    }
}

impl WatcherConfig {
    pub fn from_config(config: &TangerineConfig) -> Self {
        Self {
            debounce_duration: Duration::from_millis(config.watch.debounce_ms),
            include_hidden: config.index.include_hidden,
            extensions: config.index.extensions.clone(),
        }
    }
}

/// One debounced set of changed files, sorted and deduplicated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    pub paths: Vec<PathBuf>,
}

/// Watches one project's state directory
pub struct StateWatcher {
    state_root: PathBuf,
    config: WatcherConfig,
    running: Arc<AtomicBool>,
}

impl StateWatcher {
    pub fn new(project_root: &Path, state_dir: &str) -> Self {
        Self::with_config(project_root, state_dir, WatcherConfig::default())
    }

    pub fn with_config(project_root: &Path, state_dir: &str, config: WatcherConfig) -> Self {
        Self {
            state_root: project_root.join(state_dir),
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state_root(&self) -> &Path {
        &self.state_root
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start watching.
    ///
    /// Change batches are delivered on the returned receiver until the
    /// handle is stopped or dropped.
    pub fn start(&self) -> Result<(WatcherHandle, mpsc::UnboundedReceiver<ChangeBatch>)> {
        if !self.state_root.is_dir() {
            return Err(TangerineError::WatchError {
                message: format!("{} is not a directory", self.state_root.display()),
            });
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(TangerineError::WatchError {
                message: format!("already watching {}", self.state_root.display()),
            });
        }

        // notify reports paths under the resolved directory, not a symlink
        let watch_root = canonicalize_path(&self.state_root);
        let (raw_tx, raw_rx) = std::sync::mpsc::channel();
        let mut debouncer = match new_debouncer(self.config.debounce_duration, raw_tx) {
            Ok(debouncer) => debouncer,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(watch_error(e));
            }
        };
        if let Err(e) = debouncer
            .watcher()
            .watch(&watch_root, RecursiveMode::Recursive)
        {
            self.running.store(false, Ordering::SeqCst);
            return Err(watch_error(e));
        }
        tracing::info!("Watching {}", watch_root.display());

        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::clone(&self.running);
        let filter = PathFilter::new(&self.config);
        let state_root = watch_root;

        std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match raw_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(Ok(events)) => {
                        let paths: BTreeSet<PathBuf> = events
                            .into_iter()
                            .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                            .map(|e| e.path)
                            .filter(|p| filter.accepts(p, &state_root))
                            .collect();
                        if paths.is_empty() {
                            continue;
                        }
                        tracing::debug!("Detected {} changed files", paths.len());
                        let batch = ChangeBatch {
                            paths: paths.into_iter().collect(),
                        };
                        if tx.send(batch).is_err() {
                            break;
                        }
                    }
                    Ok(Err(e)) => tracing::warn!("Watcher error: {:?}", e),
                    Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                    Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
            running.store(false, Ordering::SeqCst);
            drop(debouncer);
            tracing::debug!("Stopped watching {}", state_root.display());
        });

        Ok((
            WatcherHandle {
                running: Arc::clone(&self.running),
            },
            rx,
        ))
    }

    /// Whether a change to `path` should be reported
    pub fn should_watch_path(&self, path: &Path) -> bool {
        PathFilter::new(&self.config).accepts(path, &self.state_root)
    }
}

struct PathFilter {
    include_hidden: bool,
    options: WalkOptions,
}

impl PathFilter {
    fn new(config: &WatcherConfig) -> Self {
        Self {
            include_hidden: config.include_hidden,
            options: WalkOptions::new().with_extensions(config.extensions.clone()),
        }
    }

    fn accepts(&self, path: &Path, state_root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(state_root) else {
            return false;
        };
        if !self.include_hidden {
            let hidden = relative.components().any(|c| match c {
                Component::Normal(name) => name.to_string_lossy().starts_with('.'),
                _ => false,
            });
            if hidden {
                return false;
            }
        }
        self.options.accepts(path)
    }
}

fn watch_error(e: notify::Error) -> TangerineError {
    TangerineError::WatchError {
        message: e.to_string(),
    }
}

/// Handle for controlling a running watcher
pub struct WatcherHandle {
    running: Arc<AtomicBool>,
}

impl WatcherHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Tests
// ============================================================================
