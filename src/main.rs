use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use kindsearch::cli::{Cli, Commands};
use kindsearch::commands::load_config;
use kindsearch::logging::init_logging;
use kindsearch::metrics;
use kindsearch::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // `init` must work even when an existing config is broken
    let config = match cli.command {
        Commands::Init { .. } => Config::default(),
        _ => load_config(cli.config.as_deref(), &root)?,
    };

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &root)?;

    tracing::info!("kindsearch starting up");
    tracing::debug!("Working directory: {}", root.display());

    metrics::register_metrics();

    match cli.command {
        Commands::Init { force } => {
            kindsearch::commands::init::run(force).await?;
        }
        Commands::Serve { port } => {
            kindsearch::commands::serve::run(config, port).await?;
        }
        Commands::Search {
            query,
            username,
            json,
        } => {
            kindsearch::commands::search::run(&config, &query, username, json).await?;
        }
        Commands::Stats { prometheus } => {
            kindsearch::commands::stats::run(&config, prometheus).await?;
        }
    }

    Ok(())
}
