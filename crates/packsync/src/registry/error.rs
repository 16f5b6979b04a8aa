//! Error types for registry queries

use thiserror::Error;

/// Errors produced by [`ModRegistry`](super::ModRegistry) implementations
///
/// Network failures, timeouts, bad statuses and malformed payloads are
/// all collapsed into [`Upstream`](RegistryError::Upstream): the caller
/// only ever distinguishes "the project does not exist" from "the
/// registry could not answer".
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The referenced project does not exist in the registry
    #[error("project '{project_ref}' was not found in the registry")]
    NotFound { project_ref: String },

    /// The registry could not be queried (timeout, 5xx, connection or
    /// decode failure)
    #[error("registry unavailable for '{url}': {reason}")]
    Upstream {
        url: String,
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    pub(crate) fn upstream(url: impl Into<String>, source: reqwest::Error) -> Self {
        let reason = if source.is_timeout() {
            "request timed out".to_string()
        } else if source.is_connect() {
            "connection failed".to_string()
        } else if source.is_decode() {
            "malformed response body".to_string()
        } else {
            source.to_string()
        };
        RegistryError::Upstream {
            url: url.into(),
            reason,
            source: Some(source),
        }
    }

    pub(crate) fn upstream_status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        RegistryError::Upstream {
            url: url.into(),
            reason: format!("server returned {status}"),
            source: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
