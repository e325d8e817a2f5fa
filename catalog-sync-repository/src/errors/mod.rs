//! Error types for the document-store gateway.

mod gateway_error;

pub use gateway_error::GatewayError;
