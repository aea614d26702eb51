//! Jump command handler - Declaration site of the best strict match

use serde_json::json;

use crate::cli::{JumpArgs, OutputFormat};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::format::to_json;

/// Run the jump command
pub async fn run_jump(args: &JumpArgs, ctx: &CommandContext) -> Result<String> {
    let project = ctx.resolve_project(args.path.as_deref())?;
    let session = project.open_session().await?;
    let target = session.jump_target(&args.query)?;

    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "_type": "jump_target",
            "query": args.query,
            "file": target.file,
            "line": target.line,
        })),
        // Editor-friendly `file:line`, one-based
        OutputFormat::Text => Ok(format!("{}\n", target)),
    }
}
