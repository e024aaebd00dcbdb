use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod command;
mod config;
mod context;
mod document;
mod i18n;
mod managers;
mod settings;
mod startup;
mod storage;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli::resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Some(Commands::Boot(args)) => command::run_boot(&data_dir, args).await?,
        Some(Commands::Migrate) => command::run_migrate(&data_dir).await?,
        Some(Commands::Status) => command::run_status(&data_dir).await?,
        // No command: boot with defaults
        None => command::run_boot(&data_dir, cli::BootArgs::default()).await?,
    }

    Ok(())
}
