//! Taskkeeper Server
//!
//! A single-user task management REST API backed by atomic JSON file
//! storage.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use taskkeeper::api;
use taskkeeper::cli::Cli;
use taskkeeper::config::Config;
use taskkeeper::service::Services;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    let mut config = Config::load_or_default(cli.config.as_deref())?;

    // Override config from CLI arguments
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    info!("Starting taskkeeper v{}", env!("CARGO_PKG_VERSION"));
    info!("Data dir: {:?}", config.storage.data_dir);

    config.ensure_data_dir()?;
    let services = Services::open(&config.storage.data_dir)?;

    api::run_server(&config, services).await?;

    Ok(())
}
