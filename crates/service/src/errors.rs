use std::time::Duration;

use thiserror::Error;

use models::errors::ModelError;

/// Failures reported by an [`EmailStore`](crate::storage::EmailStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("email already exists: {0}")]
    Conflict(String),
    #[error("email not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Backend(String),
}

impl From<ModelError> for StoreError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Conflict(msg) => StoreError::Conflict(msg),
            ModelError::NotFound(msg) => StoreError::NotFound(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Error taxonomy shared by both transports.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller-correctable input problem.
    #[error("{0}")]
    Validation(String),
    /// Any failure from the storage collaborator, surfaced with its raw message.
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
}

impl GatewayError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

    /// Stable short name for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "validation",
            GatewayError::Storage(_) => "storage",
            GatewayError::Timeout { .. } => "timeout",
        }
    }
}
