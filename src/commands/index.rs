//! Index command handler - Build and print a project's state index

use serde_json::json;

use crate::cli::{IndexArgs, OutputFormat};
use crate::commands::CommandContext;
use crate::error::{Result, TangerineError};
use crate::format::{render_index, render_records, to_json};

/// Run the index command
pub async fn run_index(args: &IndexArgs, ctx: &CommandContext) -> Result<String> {
    let project = ctx.resolve_project(args.path.as_deref())?;
    let root = project.root.clone();
    let session = project.open_session().await?;

    if let Some(query) = &args.filter {
        session.set_filter_mode(true, Some(query)).await?;
    }
    let snapshot = session
        .snapshot()
        .ok_or_else(|| TangerineError::ProjectNotFound { path: root.clone() })?;

    let records = match &args.filter {
        Some(query) if args.flat => session.search(query, None)?,
        _ => snapshot.records.to_vec(),
    };

    match ctx.format {
        OutputFormat::Json => {
            let mut value = json!({
                "_type": "state_index",
                "root": root,
                "mode": session.mode(),
                "symbol_count": snapshot.index.symbol_count(),
                "record_count": snapshot.records.len(),
            });
            if let Some(query) = &snapshot.filter_query {
                value["filter"] = json!(query);
            }
            if args.flat {
                value["records"] = json!(records);
            } else {
                value["index"] = json!(snapshot.index);
            }
            to_json(&value)
        }
        OutputFormat::Text => {
            let mut output = format!("root: {}\n", root.display());
            if let Some(query) = &snapshot.filter_query {
                output.push_str(&format!("filter: \"{}\"\n", query));
            }
            output.push('\n');
            if args.flat {
                output.push_str(&render_records(&records, Some(&root)));
            } else {
                output.push_str(&render_index(&snapshot.index, Some(&root)));
            }
            if ctx.verbose {
                output.push_str(&format!(
                    "\n{} records, {} indexed (build #{})\n",
                    snapshot.records.len(),
                    snapshot.index.symbol_count(),
                    snapshot.generation
                ));
            }
            Ok(output)
        }
    }
}
