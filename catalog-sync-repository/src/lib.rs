//! # Catalog Sync Repository
//!
//! This crate provides the document-store gateway used by the catalog
//! synchronizer. It includes the error taxonomy, the abstract
//! [`DocumentStoreGateway`] interface, and a concrete implementation for
//! OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::GatewayConfig;
pub use errors::GatewayError;
pub use interfaces::DocumentStoreGateway;
pub use opensearch::OpenSearchGateway;
pub use types::ConnectionStatus;
