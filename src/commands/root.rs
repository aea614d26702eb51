//! Root command handler - Resolve the project root of a path

use serde_json::json;

use crate::cli::{OutputFormat, RootArgs};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::format::to_json;
use crate::paths::resolve_path;

/// Run the root command
pub fn run_root(args: &RootArgs, ctx: &CommandContext) -> Result<String> {
    let path = resolve_path(args.path.as_deref())?;
    let project = ctx.resolve_project(Some(&path))?;
    let state_root = project.root.join(&project.config.index.state_dir);

    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "_type": "project_root",
            "path": path,
            "root": project.root,
            "state_root": state_root,
        })),
        OutputFormat::Text => Ok(format!("{}\n", project.root.display())),
    }
}
