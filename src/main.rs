//! modforge CLI entry point
//!
//! Dispatches to subcommands.

use clap::Parser;
use console::style;
use modforge::cli::commands::{self, Context};
use modforge::cli::{Cli, Commands};
use modforge::config::ConfigManager;
use modforge::error::ForgeResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ForgeResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("modforge=warn"),
        1 => EnvFilter::new("modforge=info"),
        _ => EnvFilter::new("modforge=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Completions don't need config loading
    if let Commands::Completions(args) = cli.command {
        commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;
    let ctx = Context::new(config, config_manager, cli.cache_dir);

    modforge::ui::init_theme();

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Repos(args) => commands::repos(args, &ctx).await,
        Commands::Update => commands::update(&ctx).await,
        Commands::Modules(args) => commands::modules(args, &ctx).await,
        Commands::Generate(args) => commands::generate(args, &ctx).await,
        Commands::SortSubmodules(args) => commands::sort_submodules(args, &ctx).await,
        Commands::Config(args) => commands::config(args, &ctx).await,
    }
}
