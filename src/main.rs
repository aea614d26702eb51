//! Tangerine CLI entry point

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use tangerine_engine::commands::{
    run_index, run_jump, run_root, run_search, run_watch, CommandContext,
};
use tangerine_engine::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = CommandContext::from_cli(cli.format, cli.verbose, cli.config.clone());
    init_logging(&ctx);

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&cli, &ctx)) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

async fn run(cli: &Cli, ctx: &CommandContext) -> tangerine_engine::Result<String> {
    match &cli.command {
        Commands::Index(args) => run_index(args, ctx).await,
        Commands::Search(args) => run_search(args, ctx).await,
        Commands::Jump(args) => run_jump(args, ctx).await,
        Commands::Root(args) => run_root(args, ctx),
        Commands::Watch(args) => run_watch(args, ctx).await,
    }
}

fn build_runtime() -> anyhow::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("tangerine-worker")
        .build()
        .context("failed to start the async runtime")
}

/// `RUST_LOG` wins, then `--verbose`, then the configured level
fn init_logging(ctx: &CommandContext) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if ctx.verbose {
            "debug".to_string()
        } else {
            ctx.load_config(None)
                .map(|config| config.logging.level)
                .unwrap_or_else(|_| "info".to_string())
        };
        EnvFilter::new(format!("tangerine_engine={level},tangerine={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
