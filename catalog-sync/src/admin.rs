//! Administrative operations.
//!
//! The operations an operator triggers by hand: queueing a resync, storing
//! the index template and search templates, updating index settings and
//! checking the connection. Outcomes are reported to a [`NoticeSink`] as
//! well as returned.

use std::sync::Arc;

use catalog_sync_pipeline::{JobId, JobRecord, NoticeSink, ResyncJobRunner};
use catalog_sync_repository::{ConnectionStatus, DocumentStoreGateway};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::Settings;
use crate::IndexingError;

pub struct AdminService {
    settings: Settings,
    gateway: Arc<dyn DocumentStoreGateway>,
    runner: Arc<ResyncJobRunner>,
}

impl AdminService {
    pub fn new(
        settings: Settings,
        gateway: Arc<dyn DocumentStoreGateway>,
        runner: Arc<ResyncJobRunner>,
    ) -> Self {
        Self {
            settings,
            gateway,
            runner,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Queue a background resync and return its job id.
    pub async fn trigger_resync(&self, purge_all: bool, notices: &dyn NoticeSink) -> JobId {
        let id = self.runner.enqueue(purge_all).await;
        notices.notice(&format!("Resync queued ({})", id));
        id
    }

    pub async fn job_status(&self, id: JobId) -> Option<JobRecord> {
        self.runner.status(id).await
    }

    /// Ask a queued or running resync to stop at its next checkpoint.
    pub async fn cancel_resync(&self, id: JobId) -> bool {
        self.runner.cancel(id).await
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        self.gateway.ping().await
    }

    /// Store the configured index template under its configured name.
    #[instrument(skip(self, notices))]
    pub async fn save_index_template(&self, notices: &dyn NoticeSink) -> Result<(), IndexingError> {
        let name = self.settings.index_template_name.trim();
        let template = if name.is_empty() {
            Err(IndexingError::config("No index template name configured"))
        } else {
            match self.settings.index_template_json() {
                Ok(Some(template)) => Ok(template),
                Ok(None) => Err(IndexingError::config("No index template configured")),
                Err(e) => Err(e),
            }
        };
        let template = match template {
            Ok(template) => template,
            Err(e) => {
                error!(name = %name, error = %e, "Failed to save index template");
                notices.error(&format!("Failed to save index template: {}", e));
                return Err(e);
            }
        };

        match self.gateway.put_index_template(name, &template).await {
            Ok(()) => {
                info!(name = %name, "Index template saved");
                notices.notice("Index template saved");
                Ok(())
            }
            Err(e) => {
                error!(name = %name, error = %e, "Failed to save index template");
                notices.error(&format!("Failed to save index template: {}", e));
                Err(e.into())
            }
        }
    }

    /// Store every configured search template.
    ///
    /// Rows are validated first; an invalid row means nothing is stored.
    /// Storing stops at the first failure. Returns the number stored.
    #[instrument(skip(self, notices))]
    pub async fn save_search_templates(
        &self,
        notices: &dyn NoticeSink,
    ) -> Result<usize, IndexingError> {
        let violations: Vec<_> = self
            .settings
            .validate()
            .into_iter()
            .filter(|v| v.field.starts_with("search_templates"))
            .collect();
        if !violations.is_empty() {
            return Err(IndexingError::SettingsInvalid(violations));
        }

        let mut saved = 0;
        for row in &self.settings.search_templates {
            let source: Value = serde_json::from_str(&row.source)?;
            let params: Option<Value> = if row.params.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&row.params)?)
            };

            if let Err(e) = self
                .gateway
                .put_search_template(&row.handle, &source, params.as_ref())
                .await
            {
                error!(handle = %row.handle, error = %e, "Failed to save search template");
                notices.error(&format!("Failed to save search template '{}': {}", row.handle, e));
                return Err(e.into());
            }
            saved += 1;
        }

        info!(saved, "Search templates saved");
        notices.notice(&format!("{} search template(s) saved", saved));
        Ok(saved)
    }

    /// Apply `settings` to every index the configuration can produce.
    ///
    /// Stops at the first failure. Returns the number of indices updated.
    #[instrument(skip(self, settings))]
    pub async fn update_index_settings(
        &self,
        settings: &Value,
        close_and_open: bool,
    ) -> Result<usize, IndexingError> {
        let engine = self.runner.engine();
        let names = engine
            .namer()
            .all_names_for(engine.filter().allow_lists(), &engine.config().sites);

        for name in &names {
            self.gateway
                .put_index_settings(name, settings, close_and_open)
                .await?;
        }

        info!(indices = names.len(), "Index settings updated");
        Ok(names.len())
    }
}
