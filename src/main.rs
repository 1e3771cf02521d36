//! Manuscript CLI
//!
//! Command-line interface for manuscript archives.

use anyhow::Context;
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use manuscript::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Manuscript v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd, cli.endpoint.as_deref(), cli.config.as_deref()).await,
        None => {
            println!("Manuscript v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

async fn handle_command(
    cmd: Commands,
    endpoint: Option<&str>,
    config_file: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    match cmd {
        Commands::Read { id } => {
            let config = commands::storage_config(endpoint, config_file)?;
            commands::read(config, id.as_deref())
                .await
                .with_context(|| format!("reading archive {}", id.as_deref().unwrap_or("<root>")))
        }
        Commands::Write { dir, id } => {
            let config = commands::storage_config(endpoint, config_file)?;
            commands::write(config, &dir, id.as_deref())
                .await
                .with_context(|| format!("writing archive folder {}", dir.display()))
        }
        Commands::Inspect { file } => commands::inspect(&file)
            .with_context(|| format!("inspecting {}", file.display())),
    }
}
