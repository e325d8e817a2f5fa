//! `catalog-sync` command line.

use std::env;
use std::process::ExitCode;

use catalog_sync::config::DependencyOptions;
use catalog_sync::{Dependencies, IndexingError, Settings};
use catalog_sync_pipeline::{JobStatus, NoticeSink};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Keeps a search index in step with a content catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild every index from the catalog
    Reindex {
        /// Delete the indices instead of only their documents
        #[arg(long)]
        purge_all: bool,

        /// Run as a background job with progress logging; Ctrl-C cancels it
        #[arg(long)]
        background: bool,
    },
    /// Check the connection to the document store
    Ping,
    /// Validate the settings file
    Validate,
    /// Store the configured index template
    SaveIndexTemplate,
    /// Store the configured search templates
    SaveSearchTemplates,
    /// Apply index settings to every configured index
    UpdateIndexSettings {
        /// Settings body as JSON, e.g. '{"index": {"number_of_replicas": 1}}'
        settings: String,

        /// Close each index before updating and reopen it afterwards
        #[arg(long)]
        close_and_open: bool,
    },
}

/// Prints operator notices through the log.
struct LogNotices;

impl NoticeSink for LogNotices {
    fn notice(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if env::var("CATALOG_SYNC_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "catalog-sync failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode, IndexingError> {
    match command {
        Commands::Validate => validate(),
        Commands::Ping => {
            let deps = Dependencies::build(&DependencyOptions::from_env()).await?;
            let status = deps.admin.connection_status().await;
            if status.is_connected() {
                info!("Document store is reachable");
                Ok(ExitCode::SUCCESS)
            } else {
                error!(status = %status, "Document store is not reachable");
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Reindex {
            purge_all,
            background,
        } => {
            let deps = Dependencies::new().await?;
            if background {
                reindex_in_background(&deps, purge_all).await
            } else {
                let report = deps.engine.resync(None, purge_all).await?;
                info!(
                    indices_cleared = report.indices_cleared,
                    indexed = report.indexed,
                    skipped = report.skipped,
                    "Reindex finished"
                );
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::SaveIndexTemplate => {
            let deps = Dependencies::new().await?;
            deps.admin.save_index_template(&LogNotices).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::SaveSearchTemplates => {
            let deps = Dependencies::new().await?;
            deps.admin.save_search_templates(&LogNotices).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::UpdateIndexSettings {
            settings,
            close_and_open,
        } => {
            let settings = parse_index_settings(&settings)?;
            let deps = Dependencies::new().await?;
            let updated = deps
                .admin
                .update_index_settings(&settings, close_and_open)
                .await?;
            info!(updated, close_and_open, "Index settings updated");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_index_settings(raw: &str) -> Result<Value, IndexingError> {
    let settings: Value = serde_json::from_str(raw)?;
    if !settings.is_object() {
        return Err(IndexingError::config("Index settings must be a JSON object"));
    }
    Ok(settings)
}

fn validate() -> Result<ExitCode, IndexingError> {
    let options = DependencyOptions::from_env();
    let settings = Settings::load(&options.settings_path)?;
    let violations = settings.validate();

    if violations.is_empty() {
        info!(path = %options.settings_path.display(), "Settings are valid");
        return Ok(ExitCode::SUCCESS);
    }

    for violation in &violations {
        error!(field = %violation.field, "{}", violation.message);
    }
    Ok(ExitCode::FAILURE)
}

async fn reindex_in_background(
    deps: &Dependencies,
    purge_all: bool,
) -> Result<ExitCode, IndexingError> {
    let id = deps.admin.trigger_resync(purge_all, &LogNotices).await;

    let record = tokio::select! {
        record = deps.runner.wait(id) => record,
        _ = tokio::signal::ctrl_c() => {
            warn!(job_id = %id, "Received shutdown signal, cancelling resync");
            deps.admin.cancel_resync(id).await;
            deps.runner.wait(id).await
        }
    };

    let Some(record) = record else {
        return Err(IndexingError::config(format!("Unknown job {}", id)));
    };

    match record.status {
        JobStatus::Completed { report } => {
            info!(job_id = %id, indexed = report.indexed, "Reindex finished");
            Ok(ExitCode::SUCCESS)
        }
        JobStatus::Cancelled => {
            warn!(job_id = %id, "Reindex cancelled");
            Ok(ExitCode::FAILURE)
        }
        status => {
            error!(job_id = %id, status = ?status, "Reindex did not complete");
            Ok(ExitCode::FAILURE)
        }
    }
}
