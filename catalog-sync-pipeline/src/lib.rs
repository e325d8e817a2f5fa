//! # Catalog Sync Pipeline
//!
//! This crate keeps a document store in step with the lifecycle of entities
//! owned by an external content repository.
//!
//! ## Architecture
//!
//! 1. **Eligibility**: decides whether an entity belongs in the index and whether it is live
//! 2. **Naming**: derives the deterministic index name for an entity and site
//! 3. **Engine**: upserts and removes single entities, routes lifecycle events
//! 4. **Resync**: rebuilds every index from the content repository, step by step
//! 5. **Jobs**: runs resyncs in the background with progress and cancellation

pub mod config;
pub mod content;
pub mod eligibility;
pub mod engine;
pub mod errors;
pub mod hooks;
pub mod jobs;
pub mod lifecycle;
pub mod naming;
pub mod resync;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SyncConfiguration;
pub use content::ContentRepository;
pub use eligibility::EligibilityFilter;
pub use engine::{
    ExecutionContext, NoticeSink, RemoveResult, RemoveSummary, SyncEngine, UpsertOutcome,
};
pub use errors::SyncError;
pub use hooks::{BeforeIndexHook, IndexerInitHook};
pub use jobs::{JobId, JobRecord, JobStatus, ResyncJobRunner};
pub use lifecycle::{IgnoreReason, LifecycleAction, LifecycleEvent, LifecycleOutcome};
pub use naming::IndexNamer;
pub use resync::{ProgressSink, ResyncReport, ResyncRun, TracingProgressSink};
