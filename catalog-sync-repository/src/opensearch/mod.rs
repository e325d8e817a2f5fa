//! OpenSearch implementation of the document-store gateway.
//!
//! This module provides a concrete implementation of `DocumentStoreGateway`
//! using OpenSearch as the backend.

mod bodies;
mod client;

pub use bodies::{match_all_query, search_template_body};
pub use client::OpenSearchGateway;
