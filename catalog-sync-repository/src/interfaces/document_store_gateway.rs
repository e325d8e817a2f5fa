//! Document-store gateway trait definition.
//!
//! This module defines the abstract interface for document-store operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::GatewayError;
use crate::types::ConnectionStatus;

/// Abstracts the underlying document store (OpenSearch, Elasticsearch, etc.).
///
/// The synchronizer treats documents as opaque JSON payloads addressed by an
/// index name and a document id. Implementations are injected into the
/// synchronizer to enable easy testing with mock implementations.
///
/// # Error Handling
///
/// All document and index operations return `Result<T, GatewayError>`. A
/// missing document is reported as [`GatewayError::NotFound`] so callers can
/// treat deletes as idempotent.
#[async_trait]
pub trait DocumentStoreGateway: Send + Sync {
    /// Index a document, replacing any existing document with the same id.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index name
    /// * `id` - The document id
    /// * `body` - The document body
    async fn index_document(&self, index: &str, id: &str, body: &Value)
        -> Result<(), GatewayError>;

    /// Delete a document.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted
    /// * `Err(GatewayError::NotFound)` - If the document (or its index) doesn't exist
    /// * `Err(GatewayError)` - If the deletion fails for any other reason
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), GatewayError>;

    /// Delete an index together with its settings and mappings.
    ///
    /// With `ignore_missing`, deleting an index that doesn't exist succeeds;
    /// otherwise it fails with [`GatewayError::IndexMissing`].
    async fn delete_index(&self, index: &str, ignore_missing: bool) -> Result<(), GatewayError>;

    /// Delete every document of an index while keeping its settings and mappings.
    ///
    /// Clearing an index that doesn't exist succeeds.
    async fn clear_index_contents(&self, index: &str) -> Result<(), GatewayError>;

    /// Check whether the document store is reachable.
    async fn ping(&self) -> ConnectionStatus;

    /// Store a (legacy) index template under `name`.
    async fn put_index_template(&self, name: &str, template: &Value) -> Result<(), GatewayError>;

    /// Store a mustache search template under `handle`.
    async fn put_search_template(
        &self,
        handle: &str,
        source: &Value,
        params: Option<&Value>,
    ) -> Result<(), GatewayError>;

    /// Update the settings of an index.
    ///
    /// Non-dynamic settings can only be changed on a closed index; with
    /// `close_and_open` the index is closed before and reopened after the update.
    async fn put_index_settings(
        &self,
        index: &str,
        settings: &Value,
        close_and_open: bool,
    ) -> Result<(), GatewayError>;
}
