//! Error types for the synchronization engine
//!
//! Provides error handling for:
//! - Remote collaborator failures (document store, table store, notifier)
//! - Configuration loading
//! - Command aborts surfaced from the core (malformed sheet, missing
//!   mandatory fields, missing marker regions)

use reqsync_core::{AssembleError, PatchError, RecordError, ERROR_BANNER};
use std::path::PathBuf;

/// Failure reported by a remote collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Non-success status
    #[error("{service} returned status {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Request never produced a response
    #[error("{service} unreachable: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// Requested item does not exist
    #[error("{service} has no {what}")]
    NotFound { service: &'static str, what: String },
}

impl RemoteError {
    /// Create status error
    pub fn status(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            service,
            status,
            message: message.into(),
        }
    }

    /// Create not-found error
    pub fn not_found(service: &'static str, what: impl Into<String>) -> Self {
        Self::NotFound {
            service,
            what: what.into(),
        }
    }
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// `id_pattern` is not a valid regex
    #[error("invalid id pattern '{pattern}': {message}")]
    InvalidIdPattern { pattern: String, message: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Top-level error of a synchronization command
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("malformed source: {0}")]
    MalformedSource(#[from] RecordError),

    #[error("assembly failed: {0}")]
    Assemble(#[from] AssembleError),

    #[error("patch failed: {0}")]
    Patch(#[from] PatchError),

    #[error("requirement '{0}' not found in the sheet")]
    RequirementNotFound(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// Check if retrying the same command could succeed without human action
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Remote(RemoteError::Status { status: 500..=599 | 429, .. })
                | Self::Remote(RemoteError::Transport { .. })
        )
    }

    /// Message delivered to the operator when a command aborts
    #[must_use]
    pub fn operator_message(&self) -> String {
        match self {
            Self::MalformedSource(err) => err.diagnostic(),
            Self::Assemble(err) => format!("{}({err})", ERROR_BANNER),
            other => format!("Synchronization aborted: {other}"),
        }
    }
}

/// Result type alias for engine commands
pub type SyncResult<T> = Result<T, SyncError>;
