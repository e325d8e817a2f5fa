//! Error types for the synchronizer core.

use catalog_sync_repository::GatewayError;
use thiserror::Error;

/// Errors that can occur while synchronizing entities.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// Error from the document-store gateway.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Error from the content repository.
    #[error("Content error: {0}")]
    ContentError(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The resync was cancelled between two steps.
    #[error("Resync cancelled")]
    Cancelled,
}

impl SyncError {
    /// Create a content error.
    pub fn content(msg: impl Into<String>) -> Self {
        Self::ContentError(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Whether a background runner may retry the failed operation.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Gateway(e) => e.is_transient(),
            _ => false,
        }
    }
}
