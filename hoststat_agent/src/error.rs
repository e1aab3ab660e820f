//! Error types for collector construction and metric collection.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading one statistic from the platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("no filesystem mounted at {0}")]
    MountNotFound(PathBuf),

    #[error("hostname lookup failed: {0}")]
    Hostname(#[source] io::Error),
}

impl PlatformError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PlatformError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Required settings are missing or unusable; no collector is built.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The configured network interface is not present on the host.
    #[error("interface {name} not found")]
    InterfaceNotFound { name: String },

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl Error {
    pub fn is_interface_not_found(&self) -> bool {
        matches!(self, Error::InterfaceNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
