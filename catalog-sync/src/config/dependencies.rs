//! Dependency initialization and wiring for the catalog synchronizer.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::admin::AdminService;
use crate::catalog::JsonCatalogRepository;
use crate::config::Settings;
use crate::IndexingError;
use catalog_sync_pipeline::{ResyncJobRunner, SyncEngine, TracingProgressSink};
use catalog_sync_repository::{DocumentStoreGateway, GatewayConfig, OpenSearchGateway};

/// Default deployment environment.
const DEFAULT_ENVIRONMENT: &str = "production";

/// Default settings file.
const DEFAULT_SETTINGS_PATH: &str = "catalog-sync.json";

/// Default catalog file.
const DEFAULT_CATALOG_PATH: &str = "catalog.json";

/// Where the synchronizer reads its configuration from.
#[derive(Debug, Clone)]
pub struct DependencyOptions {
    pub environment: String,
    pub settings_path: PathBuf,
    pub catalog_path: PathBuf,
}

impl DependencyOptions {
    /// Read the options from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CATALOG_SYNC_ENV`: deployment environment used to pick hosts (default: production)
    /// - `CATALOG_SYNC_SETTINGS`: settings file (default: catalog-sync.json)
    /// - `CATALOG_SYNC_CATALOG`: catalog file (default: catalog.json)
    pub fn from_env() -> Self {
        let environment =
            env::var("CATALOG_SYNC_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        let settings_path =
            env::var("CATALOG_SYNC_SETTINGS").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        let catalog_path =
            env::var("CATALOG_SYNC_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string());

        Self {
            environment,
            settings_path: settings_path.into(),
            catalog_path: catalog_path.into(),
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub settings: Settings,
    pub gateway: Arc<dyn DocumentStoreGateway>,
    pub engine: Arc<SyncEngine>,
    pub runner: Arc<ResyncJobRunner>,
    pub admin: AdminService,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables and verify
    /// the document store is reachable.
    ///
    /// An unreachable document store is logged, not fatal: the connection
    /// status is reported again by the operations that need it.
    pub async fn new() -> Result<Self, IndexingError> {
        let deps = Self::build(&DependencyOptions::from_env()).await?;

        let status = deps.gateway.ping().await;
        if status.is_connected() {
            info!("Document store connection verified");
        } else {
            warn!(status = %status, "Document store is not reachable");
        }

        Ok(deps)
    }

    /// Wire every component from `options` without touching the network.
    pub async fn build(options: &DependencyOptions) -> Result<Self, IndexingError> {
        info!(
            environment = %options.environment,
            settings = %options.settings_path.display(),
            catalog = %options.catalog_path.display(),
            "Initializing dependencies"
        );

        let settings = Settings::load(&options.settings_path)?;
        let violations = settings.validate();
        if !violations.is_empty() {
            return Err(IndexingError::SettingsInvalid(violations));
        }

        let config = settings.sync_configuration(&options.environment, &[])?;

        let gateway: Arc<dyn DocumentStoreGateway> = Arc::new(
            OpenSearchGateway::new(&GatewayConfig::new(config.hosts.clone()))
                .await
                .map_err(|e| {
                    IndexingError::config(format!("Failed to create document store client: {}", e))
                })?,
        );

        let content = Arc::new(JsonCatalogRepository::load(&options.catalog_path)?);

        info!(
            prefix = %config.index_prefix,
            sites = config.sites.len(),
            entities = content.len(),
            "Synchronizer configured"
        );

        let engine = Arc::new(SyncEngine::new(config, gateway.clone(), content));
        let runner = Arc::new(
            ResyncJobRunner::new(engine.clone()).with_progress_sink(Arc::new(TracingProgressSink)),
        );
        let admin = AdminService::new(settings.clone(), gateway.clone(), runner.clone());

        Ok(Self {
            settings,
            gateway,
            engine,
            runner,
            admin,
        })
    }
}
