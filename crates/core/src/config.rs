//! Application Configuration
//!
//! Manages all editor settings including:
//! - Tab stop size, render refresh interval and color theme
//! - Viewport edge offsets
//! - Logging destination and level

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TeditError};

/// Default distance between tab stops
pub const DEFAULT_TAB_SIZE: usize = 8;

/// Default render loop period in milliseconds (roughly 60 Hz)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 16;

/// Editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Distance between tab stops
    pub tab_size: usize,
    /// Sleep between two repaints of the render loop
    pub refresh_interval_ms: u64,
    /// Name of the color theme
    pub theme: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            theme: "dark".to_string(),
        }
    }
}

/// Viewport edge offsets.
///
/// An offset is the distance from a border of the terminal at which the
/// file starts or stops being displayed. A negative offset is measured from
/// the opposite edge: a top offset of -1 starts the view on the last row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    pub top_offset: i32,
    pub bottom_offset: i32,
    pub left_offset: i32,
    pub right_offset: i32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            top_offset: 0,
            // Last row is the status line.
            bottom_offset: 1,
            left_offset: 0,
            right_offset: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Log file; defaults to `tedit.log` in the data directory
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// Editor settings
    pub editor: EditorConfig,
    /// Viewport settings
    pub view: ViewConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            editor: EditorConfig::default(),
            view: ViewConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "tedit", "tedit")
    }

    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Resolve where log output goes
    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            Self::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("tedit.log")
        })
    }

    /// Load configuration from the default location
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| TeditError::Config("Cannot determine config path".into()))?;
        Self::load_from(&config_file).await
    }

    /// Load configuration from a file, writing the defaults there if it is missing
    pub async fn load_from(config_file: &Path) -> Result<Self> {
        if config_file.exists() {
            debug!("Loading config from {:?}", config_file);
            let contents = tokio::fs::read_to_string(config_file).await?;
            let config: AppConfig = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            info!("Config file not found, using defaults");
            let config = AppConfig::default();
            config.save_to(config_file).await?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let config_file = Self::config_file()
            .ok_or_else(|| TeditError::Config("Cannot determine config path".into()))?;
        self.save_to(&config_file).await
    }

    /// Save configuration to a file
    pub async fn save_to(&self, config_file: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = config_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(config_file, contents).await?;

        debug!("Config saved to {:?}", config_file);
        Ok(())
    }

    /// Reject settings the editor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.editor.tab_size == 0 {
            return Err(TeditError::Config("editor.tab_size must be at least 1".into()));
        }
        if self.editor.refresh_interval_ms == 0 {
            return Err(TeditError::Config(
                "editor.refresh_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
