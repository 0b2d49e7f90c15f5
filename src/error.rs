//! Error types for the organizer

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FsortError>;

/// A single file or folder could not be relocated.
///
/// Carries the original path so the caller can log it and move on to the
/// next item.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct RelocationError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl RelocationError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum FsortError {
    /// The destination root could not be created
    #[error("Failed to create destination {}: {source}", .path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid destination folder name: {0}")]
    InvalidDestination(String),

    #[error(transparent)]
    Relocation(#[from] RelocationError),

    /// The run log could not be appended
    #[error("Failed to write run log {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to start worker runtime: {0}")]
    Runtime(#[source] io::Error),
}
