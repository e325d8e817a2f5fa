//! Interface definitions for the document store.
//!
//! This module defines the abstract `DocumentStoreGateway` trait that allows
//! for dependency injection and swappable document-store implementations.

mod document_store_gateway;

pub use document_store_gateway::DocumentStoreGateway;
