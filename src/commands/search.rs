//! Search command handler - Fuzzy search over exported state symbols

use serde_json::json;

use crate::cli::{OutputFormat, SearchArgs};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::format::{render_records, to_json};

/// Run the search command
pub async fn run_search(args: &SearchArgs, ctx: &CommandContext) -> Result<String> {
    let mut project = ctx.resolve_project(args.path.as_deref())?;
    if args.limit.is_some() {
        project.config.search.limit = args.limit;
    }
    let root = project.root.clone();
    let threshold = args
        .threshold
        .unwrap_or(project.config.search.search_threshold);
    let session = project.open_session().await?;

    let records = session.search(&args.query, Some(threshold))?;
    tracing::debug!("'{}' matched {} records", args.query, records.len());

    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "_type": "search",
            "query": args.query,
            "threshold": threshold,
            "count": records.len(),
            "results": records,
        })),
        OutputFormat::Text => {
            let mut output = format!("query: \"{}\" (threshold {:.2})\n\n", args.query, threshold);
            output.push_str(&render_records(&records, Some(&root)));
            Ok(output)
        }
    }
}
