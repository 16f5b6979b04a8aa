//! Error types for the local reconciler

use std::path::PathBuf;

use thiserror::Error;

/// Types of file operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    CreateDir,
    Rename,
    Metadata,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::Rename => write!(f, "renaming"),
            FileOperation::Metadata => write!(f, "reading metadata"),
        }
    }
}

/// Errors that fail a reconcile session
///
/// Reconcile failures are not absorbed: any single one aborts the whole
/// session, since a half-applied mod set is worse than a clearly failed
/// one (missing dependency = game crash at launch).
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed on '{path}'")]
    Io {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("download of '{url}' failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for '{url}'")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("overrides archive could not be applied")]
    Overrides {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ReconcileError {
    pub(crate) fn io(path: impl Into<PathBuf>, operation: FileOperation, source: std::io::Error) -> Self {
        ReconcileError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Check if error is worth retrying within the session
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReconcileError::Network { source, .. } => source
                .status()
                .map_or(true, |status| status.is_server_error() || status == 429),
            ReconcileError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == 429
            }
            ReconcileError::Io { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            ReconcileError::Client { .. } => false,
            ReconcileError::Overrides { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
