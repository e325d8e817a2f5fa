//! # Catalog Sync
//!
//! Application crate for the catalog synchronizer.
//!
//! This crate provides the settings model, the wiring of the synchronizer
//! from the environment, the administrative operations and a file-backed
//! content repository used by the `catalog-sync` binary.

pub mod admin;
pub mod catalog;
pub mod config;

pub use admin::AdminService;
pub use catalog::JsonCatalogRepository;
pub use config::{Dependencies, HostEntry, SearchTemplateRow, Settings, SettingsViolation};

use thiserror::Error;

/// Errors that can occur during initialization or administrative operations.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Settings failed validation. Nothing was applied.
    #[error("Invalid settings: {}", join_violations(.0))]
    SettingsInvalid(Vec<SettingsViolation>),

    /// Synchronization error.
    #[error("Sync error: {0}")]
    SyncError(#[from] catalog_sync_pipeline::SyncError),

    /// Document-store error.
    #[error("Gateway error: {0}")]
    GatewayError(#[from] catalog_sync_repository::GatewayError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

fn join_violations(violations: &[SettingsViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
