//! Watch command handler - Rebuild the index on state directory changes
//!
//! Every rebuild prints one status line (text) or one compact JSON object
//! per line (json) until interrupted with Ctrl-C.

use std::time::Duration;

use serde_json::json;

use crate::cli::{OutputFormat, WatchArgs};
use crate::commands::CommandContext;
use crate::error::{Result, TangerineError};
use crate::session::IndexSession;
use crate::watcher::{ChangeBatch, StateWatcher, WatcherConfig};

/// Run the watch command
pub async fn run_watch(args: &WatchArgs, ctx: &CommandContext) -> Result<String> {
    let project = ctx.resolve_project(args.path.as_deref())?;
    let root = project.root.clone();
    let mut watcher_config = WatcherConfig::from_config(&project.config);
    if let Some(ms) = args.debounce_ms {
        watcher_config.debounce_duration = Duration::from_millis(ms);
    }
    let watcher =
        StateWatcher::with_config(&root, &project.config.index.state_dir, watcher_config);

    let session = project.open_session().await?;
    if let Some(query) = &args.filter {
        session.set_filter_mode(true, Some(query)).await?;
    }

    // Watch before the first status line: callers edit files once they see it
    let (handle, mut changes) = watcher.start()?;
    println!("{}", status_line(&session, ctx, None)?);
    let mut rebuilds = 0usize;

    loop {
        tokio::select! {
            batch = changes.recv() => {
                let Some(batch) = batch else { break };
                tracing::debug!("Changed: {:?}", batch.paths);
                session.on_save(&root).await;
                rebuilds += 1;
                println!("{}", status_line(&session, ctx, Some(&batch))?);
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!("Could not listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
    }

    handle.stop();
    session.shutdown();

    match ctx.format {
        OutputFormat::Json => Ok(format!(
            "{}\n",
            json!({"_type": "watch_stopped", "root": root, "rebuilds": rebuilds})
        )),
        OutputFormat::Text => Ok(format!(
            "Stopped watching {} after {} rebuilds\n",
            root.display(),
            rebuilds
        )),
    }
}

fn status_line(
    session: &IndexSession,
    ctx: &CommandContext,
    batch: Option<&ChangeBatch>,
) -> Result<String> {
    let snapshot = session.snapshot().ok_or_else(|| TangerineError::WatchError {
        message: "project index disappeared".to_string(),
    })?;
    let changed = batch.map(|b| b.paths.len()).unwrap_or(0);

    Ok(match ctx.format {
        OutputFormat::Json => json!({
            "_type": "index_updated",
            "root": snapshot.root,
            "generation": snapshot.generation,
            "mode": session.mode(),
            "symbol_count": snapshot.index.symbol_count(),
            "changed_files": changed,
        })
        .to_string(),
        OutputFormat::Text => format!(
            "[#{}] {} symbols indexed ({} actions, {} reducers, {} selectors){}",
            snapshot.generation,
            snapshot.index.symbol_count(),
            snapshot.index.actions.symbol_count(),
            snapshot.index.reducers.symbol_count(),
            snapshot.index.selectors.symbol_count(),
            if changed > 0 {
                format!(", {} changed files", changed)
            } else {
                String::new()
            }
        ),
    })
}
