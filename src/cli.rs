//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use tedit_core::AppConfig;

/// Terminal text editor
#[derive(Debug, Parser)]
#[command(bin_name = "tedit")]
#[command(version, about)]
#[command(next_line_help = true)]
pub struct CliArg {
    /// Files to edit; none starts with an empty buffer
    #[arg(name = "file paths")]
    pub files: Vec<PathBuf>,

    /// Distance between tab stops, overriding the config file
    #[arg(long, short = 't', value_parser = clap::value_parser!(u16).range(1..))]
    pub tab_size: Option<u16>,

    /// Read configuration from this file instead of the default location
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write the log here instead of the configured file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliArg {
    /// Let command-line flags override loaded settings
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(tab_size) = self.tab_size {
            config.editor.tab_size = usize::from(tab_size);
        }
        if let Some(log_file) = &self.log_file {
            config.log.file = Some(log_file.clone());
        }
    }
}
