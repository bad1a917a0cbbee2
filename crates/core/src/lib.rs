//! tedit Core - shared types
//!
//! This crate provides the error type and the configuration model used by
//! the editor engine, the terminal frontend and the binary.

pub mod config;
pub mod error;

pub use config::{AppConfig, EditorConfig, LogConfig, ViewConfig};
pub use error::{Result, TeditError};

/// tedit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "tedit";
