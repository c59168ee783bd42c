//! Skeg - concurrent chart fetch cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use skeg::cli::{Cli, Commands};
use skeg::config::{ConfigManager, Settings};
use skeg::error::SkegResult;
use skeg::PackageClient;
use std::process::ExitCode;
use tracing::debug;
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

async fn run() -> SkegResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("skeg=warn"),
        1 => EnvFilter::new("skeg=info"),
        _ => EnvFilter::new("skeg=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }

    debug!("Using config {}", config_manager.path().display());
    let settings = Settings::from_config(&config, cli.home.clone());
    debug!("Home directory {}", settings.home.display());

    let client = PackageClient::from_config(&config, &settings);

    // Dispatch to command
    match cli.command {
        Commands::Fetch(args) => skeg::cli::commands::fetch(args, &client).await,
        Commands::Resolve(args) => skeg::cli::commands::resolve(args, &client).await,
        Commands::Cache(args) => skeg::cli::commands::cache(args, &client).await,
        Commands::Repo(args) => skeg::cli::commands::repo(args, &config).await,
        Commands::Config(args) => {
            skeg::cli::commands::config(args, &config_manager, &config).await
        }
        Commands::Plan(args) => skeg::cli::commands::plan(args, &client).await,
    }
}
