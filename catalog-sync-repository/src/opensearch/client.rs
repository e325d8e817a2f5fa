//! OpenSearch gateway implementation.
//!
//! This module provides the concrete implementation of `DocumentStoreGateway`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCloseParts, IndicesDeleteParts, IndicesOpenParts, IndicesPutSettingsParts,
        IndicesPutTemplateParts,
    },
    DeleteByQueryParts, DeleteParts, IndexParts, OpenSearch, PutScriptParts,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::interfaces::DocumentStoreGateway;
use crate::opensearch::bodies::{match_all_query, search_template_body};
use crate::types::ConnectionStatus;

/// OpenSearch gateway implementation.
///
/// Holds a single client handle that is created once and shared by every
/// operation of the synchronizer.
///
/// # Example
///
/// ```ignore
/// use catalog_sync_repository::{GatewayConfig, OpenSearchGateway};
///
/// let config = GatewayConfig::new(vec!["http://localhost:9200".to_string()]);
/// let gateway = OpenSearchGateway::new(&config).await?;
///
/// gateway
///     .index_document("craft_news_en_en-us", "42", &json!({ "title": "Hello" }))
///     .await?;
/// ```
pub struct OpenSearchGateway {
    client: OpenSearch,
    host: Url,
}

impl OpenSearchGateway {
    /// Create a new OpenSearch gateway for the configured hosts.
    ///
    /// Requests go to the first host; additional hosts are logged and ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchGateway)` - A new gateway instance
    /// * `Err(GatewayError)` - If no host is configured or transport setup fails
    pub async fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let host = config
            .primary_host()
            .ok_or_else(|| GatewayError::connection("No document store hosts configured"))?;

        let parsed_url = Url::parse(host).map_err(|e| GatewayError::connection(e.to_string()))?;

        if config.hosts.len() > 1 {
            warn!(
                host = %parsed_url,
                ignored = config.hosts.len() - 1,
                "Multiple hosts configured, using the first one"
            );
        }

        let conn_pool = SingleNodeConnectionPool::new(parsed_url.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let transport = builder
            .build()
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(host = %parsed_url, "Created OpenSearch gateway");

        Ok(Self {
            client,
            host: parsed_url,
        })
    }

    /// The host requests are sent to.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Turn an unsuccessful response into an error, logging its body.
    async fn ensure_success(
        response: Response,
        otherwise: fn(String) -> GatewayError,
    ) -> Result<(), GatewayError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "Request failed");
        Err(GatewayError::from_status(
            status.as_u16(),
            &error_body,
            otherwise,
        ))
    }
}

#[async_trait]
impl DocumentStoreGateway for OpenSearchGateway {
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        Self::ensure_success(response, GatewayError::IndexError).await?;

        debug!(index = %index, id = %id, "Document indexed");
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        // 404 is reported separately so callers can treat it as success
        if response.status_code().as_u16() == 404 {
            debug!(index = %index, id = %id, "Document to delete not found");
            return Err(GatewayError::not_found(index, id));
        }

        Self::ensure_success(response, GatewayError::DeleteError).await?;

        debug!(index = %index, id = %id, "Document deleted");
        Ok(())
    }

    async fn delete_index(&self, index: &str, ignore_missing: bool) -> Result<(), GatewayError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            if ignore_missing {
                debug!(index = %index, "Index to delete does not exist");
                return Ok(());
            }
            return Err(GatewayError::index_missing(index));
        }

        Self::ensure_success(response, GatewayError::DeleteError).await?;

        info!(index = %index, "Index deleted");
        Ok(())
    }

    async fn clear_index_contents(&self, index: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .ignore_unavailable(true)
            .body(match_all_query())
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            debug!(index = %index, "Index to clear does not exist");
            return Ok(());
        }

        Self::ensure_success(response, GatewayError::DeleteError).await?;

        info!(index = %index, "Index contents cleared");
        Ok(())
    }

    async fn ping(&self) -> ConnectionStatus {
        match self.client.ping().send().await {
            Ok(response) if response.status_code().is_success() => ConnectionStatus::Connected,
            Ok(response) => ConnectionStatus::Unreachable(format!(
                "Ping failed with status {}",
                response.status_code()
            )),
            Err(e) => ConnectionStatus::Unreachable(e.to_string()),
        }
    }

    async fn put_index_template(&self, name: &str, template: &Value) -> Result<(), GatewayError> {
        let response = self
            .client
            .indices()
            .put_template(IndicesPutTemplateParts::Name(name))
            .body(template)
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        Self::ensure_success(response, GatewayError::TemplateError).await?;

        info!(name = %name, "Index template stored");
        Ok(())
    }

    async fn put_search_template(
        &self,
        handle: &str,
        source: &Value,
        params: Option<&Value>,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .put_script(PutScriptParts::Id(handle))
            .body(search_template_body(source, params))
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        Self::ensure_success(response, GatewayError::TemplateError).await?;

        info!(handle = %handle, "Search template stored");
        Ok(())
    }

    async fn put_index_settings(
        &self,
        index: &str,
        settings: &Value,
        close_and_open: bool,
    ) -> Result<(), GatewayError> {
        if close_and_open {
            let response = self
                .client
                .indices()
                .close(IndicesCloseParts::Index(&[index]))
                .send()
                .await
                .map_err(|e| GatewayError::connection(e.to_string()))?;
            Self::ensure_success(response, GatewayError::SettingsError).await?;
        }

        let result = match self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[index]))
            .body(settings)
            .send()
            .await
        {
            Ok(response) => Self::ensure_success(response, GatewayError::SettingsError).await,
            Err(e) => Err(GatewayError::connection(e.to_string())),
        };

        // Reopen even when the update failed so the index stays usable
        if close_and_open {
            let response = self
                .client
                .indices()
                .open(IndicesOpenParts::Index(&[index]))
                .send()
                .await
                .map_err(|e| GatewayError::connection(e.to_string()))?;
            Self::ensure_success(response, GatewayError::SettingsError).await?;
        }

        result?;

        info!(index = %index, close_and_open, "Index settings updated");
        Ok(())
    }
}
