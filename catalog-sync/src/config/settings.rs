//! Persisted settings of the catalog synchronizer.
//!
//! Settings are stored as a JSON file. Templates are kept as raw JSON text,
//! the way an operator enters them, and only parsed when validated or used.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use catalog_sync_pipeline::{IndexerInitHook, SyncConfiguration};
use catalog_sync_shared::{AllowLists, EntityKind, Site};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::IndexingError;

/// A document-store host for one deployment environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostEntry {
    pub environment: String,
    pub url: String,
    #[serde(default)]
    pub index_prefix: String,
}

/// A stored search template: a handle, a mustache source and default params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTemplateRow {
    pub handle: String,
    pub source: String,
    #[serde(default)]
    pub params: String,
}

/// A validation failure attached to a settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsViolation {
    pub field: String,
    pub message: String,
}

impl SettingsViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SettingsViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hosts: Vec<HostEntry>,
    pub sites: Vec<Site>,
    pub document_handles: Vec<String>,
    pub category_handles: Vec<String>,
    pub file_handles: Vec<String>,
    pub index_template_name: String,
    pub index_template: String,
    pub search_templates: Vec<SearchTemplateRow>,
}

impl Settings {
    /// Read settings from a JSON file. The result is not validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexingError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;

        debug!(path = %path.display(), hosts = settings.hosts.len(), "Settings loaded");
        Ok(settings)
    }

    /// Validate and write settings to a JSON file.
    ///
    /// Nothing is written when validation fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), IndexingError> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(IndexingError::SettingsInvalid(violations));
        }

        let path = path.as_ref();
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;

        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Check every field and report all violations at once.
    pub fn validate(&self) -> Vec<SettingsViolation> {
        let mut violations = Vec::new();

        if self.hosts.is_empty() {
            violations.push(SettingsViolation::new("hosts", "At least one host is required"));
        }
        for (i, host) in self.hosts.iter().enumerate() {
            if host.environment.trim().is_empty() {
                violations.push(SettingsViolation::new(
                    format!("hosts[{}].environment", i),
                    "Environment cannot be blank",
                ));
            }
            if host.url.trim().is_empty() {
                violations.push(SettingsViolation::new(
                    format!("hosts[{}].url", i),
                    "URL cannot be blank",
                ));
            }
        }

        if self.sites.is_empty() {
            violations.push(SettingsViolation::new("sites", "At least one site is required"));
        }

        if let Err(e) = parse_optional_json(&self.index_template) {
            violations.push(SettingsViolation::new(
                "index_template",
                format!("Invalid JSON: {}", e),
            ));
        }

        for (i, row) in self.search_templates.iter().enumerate() {
            if row.handle.trim().is_empty() {
                violations.push(SettingsViolation::new(
                    format!("search_templates[{}].handle", i),
                    "Handle cannot be blank",
                ));
            }
            if let Err(e) = serde_json::from_str::<Value>(&row.source) {
                violations.push(SettingsViolation::new(
                    format!("search_templates[{}].source", i),
                    format!("Invalid JSON: {}", e),
                ));
            }
            if let Err(e) = parse_optional_json(&row.params) {
                violations.push(SettingsViolation::new(
                    format!("search_templates[{}].params", i),
                    format!("Invalid JSON: {}", e),
                ));
            }
        }

        violations
    }

    /// The configured index template, parsed. `None` when none is set.
    pub fn index_template_json(&self) -> Result<Option<Value>, IndexingError> {
        Ok(parse_optional_json(&self.index_template)?)
    }

    /// Allow-lists built from the configured group handles.
    pub fn allow_lists(&self) -> AllowLists {
        let mut lists = AllowLists::new();
        lists.add_all(EntityKind::Document, &self.document_handles);
        lists.add_all(EntityKind::Category, &self.category_handles);
        lists.add_all(EntityKind::File, &self.file_handles);
        lists
    }

    /// Build the immutable synchronizer configuration for `environment`.
    ///
    /// Every host entry of the environment is kept; when several carry a
    /// prefix, the last one wins. Init hooks may add group handles.
    pub fn sync_configuration(
        &self,
        environment: &str,
        init_hooks: &[Arc<dyn IndexerInitHook>],
    ) -> Result<SyncConfiguration, IndexingError> {
        let entries: Vec<&HostEntry> = self
            .hosts
            .iter()
            .filter(|h| h.environment == environment)
            .collect();

        let Some(last) = entries.last() else {
            return Err(IndexingError::config(format!(
                "No hosts configured for environment '{}'",
                environment
            )));
        };

        let hosts = entries.iter().map(|h| h.url.clone()).collect();
        let prefix = last.index_prefix.clone();

        Ok(SyncConfiguration::new(hosts, prefix, self.sites.clone())
            .with_allow_lists(&self.allow_lists())
            .with_init_hooks(init_hooks))
    }
}

fn parse_optional_json(raw: &str) -> Result<Option<Value>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw).map(Some)
}
