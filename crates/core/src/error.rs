//! Error types for tedit
//!
//! Centralized error handling using thiserror.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for tedit
#[derive(Error, Debug)]
pub enum TeditError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("File is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    #[error("Buffer is not linked to a file")]
    NotLinked,

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for tedit operations
pub type Result<T> = std::result::Result<T, TeditError>;

impl TeditError {
    /// Classify an I/O error raised while touching `path`
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => TeditError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => TeditError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::WouldBlock => TeditError::Locked(path.to_path_buf()),
            _ => TeditError::Io(err),
        }
    }

    /// Check if this error is a missing file
    pub fn is_not_found(&self) -> bool {
        match self {
            TeditError::NotFound(_) => true,
            TeditError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this error is recoverable (the caller may retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TeditError::Locked(_) | TeditError::NotLinked)
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TeditError::Io(e) => format!("File operation failed: {}", e),
            TeditError::Config(msg) => format!("Configuration error: {}", msg),
            TeditError::NotFound(path) => format!("No such file: {}", path.display()),
            TeditError::PermissionDenied(path) => format!("Permission denied: {}", path.display()),
            TeditError::Locked(path) => format!("{} is locked, try again", path.display()),
            TeditError::NotLinked => "No file name, use write-as".to_string(),
            _ => self.to_string(),
        }
    }
}
