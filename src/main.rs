//! tedit - terminal text editor
//!
//! Entry point: reads arguments and configuration, sets up logging, opens
//! the requested files and hands over to the terminal frontend.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tedit::cli::CliArg;
use tedit::core::AppConfig;
use tedit::editor::{EditorState, SharedState};
use tedit::ui::{terminal_size, App};
use tedit::{APP_NAME, VERSION};

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArg::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path).await,
        None => AppConfig::load().await,
    }
    .context("failed to load configuration")?;
    args.apply_to(&mut config);
    config.validate().context("invalid configuration")?;

    init_logging(&config)?;
    info!("{} v{} starting", APP_NAME, VERSION);

    let mut state = EditorState::from_config(&config, terminal_size());
    state
        .open_files(&args.files)
        .context("failed to open files")?;

    App::new(SharedState::new(state), &config).run().await?;

    info!("{} exiting", APP_NAME);
    Ok(())
}

/// Send log output to a file; the terminal belongs to the editor
fn init_logging(config: &AppConfig) -> Result<()> {
    let log_file = config.log_file();
    let dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", log_file.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to set tracing subscriber: {}", e))
}
