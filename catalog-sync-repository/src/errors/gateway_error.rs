//! Gateway error types.
//!
//! This module defines the errors that can occur while talking to the
//! document store, and how they are classified.

use thiserror::Error;

/// Errors that can occur during document-store operations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Failed to reach the document store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The document store is overloaded or failing (429 or 5xx).
    #[error("Document store unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to delete a document or an index.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Index does not exist.
    #[error("Index missing: {0}")]
    IndexMissing(String),

    /// Failed to store an index or search template.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Failed to update index settings.
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GatewayError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a not found error for a document.
    pub fn not_found(index: &str, id: &str) -> Self {
        Self::NotFound(format!("index={}, id={}", index, id))
    }

    /// Create an index missing error.
    pub fn index_missing(index: impl Into<String>) -> Self {
        Self::IndexMissing(index.into())
    }

    /// Create a template error.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::TemplateError(msg.into())
    }

    /// Create a settings error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::SettingsError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Map an unsuccessful HTTP status to an error.
    ///
    /// 429 and 5xx become [`GatewayError::Unavailable`]; anything else is
    /// built with `otherwise`.
    pub fn from_status(
        status: u16,
        body: &str,
        otherwise: impl FnOnce(String) -> GatewayError,
    ) -> Self {
        if status == 429 || (500..600).contains(&status) {
            Self::Unavailable {
                status,
                message: body.to_string(),
            }
        } else {
            otherwise(format!("Request failed with status {}: {}", status, body))
        }
    }

    /// Whether the error means the target document or index does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::IndexMissing(_))
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::Unavailable { .. })
    }
}
