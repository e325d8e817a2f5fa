//! Full-catalog resynchronization.
//!
//! A resync runs in two phases. The purge phase deletes (or clears) every
//! index the configuration can produce and completes before anything is
//! indexed. The index phase walks the configured sites in order and upserts
//! every eligible, live entity, one step per entity.
//!
//! [`SyncEngine::start_resync`] performs the purge phase and returns a
//! [`ResyncRun`] that the caller pulls steps from, so a job runner can check
//! for cancellation between steps. [`SyncEngine::resync`] drives a run to
//! completion inline.

mod progress;
mod run;

pub use progress::{ProgressSink, TracingProgressSink};
pub use run::ResyncRun;

use tracing::{info, instrument};

use crate::engine::SyncEngine;
use crate::errors::SyncError;

/// Counters collected over a resync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResyncReport {
    /// Sites walked.
    pub sites: usize,
    /// Indices deleted or cleared during the purge phase.
    pub indices_cleared: usize,
    /// Whether indices were deleted rather than cleared.
    pub purged: bool,
    /// Entities written to the document store.
    pub indexed: usize,
    /// Entities whose rendered content was empty.
    pub nothing_to_index: usize,
    /// Entities enumerated but not eligible or not live.
    pub skipped: usize,
}

impl SyncEngine {
    /// Run the purge phase and return the index phase as a pull-based run.
    ///
    /// With `purge_all` every derived index is deleted, otherwise only its
    /// documents are. A purge failure aborts the resync before any entity is
    /// indexed.
    #[instrument(skip(self))]
    pub async fn start_resync(&self, purge_all: bool) -> Result<ResyncRun<'_>, SyncError> {
        let names = self
            .namer()
            .all_names_for(self.filter().allow_lists(), &self.config().sites);

        info!(indices = names.len(), purge_all, "Starting resync");

        for name in &names {
            if purge_all {
                self.gateway().delete_index(name, true).await?;
            } else {
                self.gateway().clear_index_contents(name).await?;
            }
        }

        let report = ResyncReport {
            sites: self.config().sites.len(),
            indices_cleared: names.len(),
            purged: purge_all,
            ..Default::default()
        };

        Ok(ResyncRun::new(self, report))
    }

    /// Resynchronize the whole catalog inline.
    ///
    /// Checkpoints are passed to `sink` when one is given. The final state of
    /// the document store is the same either way.
    pub async fn resync(
        &self,
        sink: Option<&dyn ProgressSink>,
        purge_all: bool,
    ) -> Result<ResyncReport, SyncError> {
        let mut run = self.start_resync(purge_all).await?;

        while let Some(progress) = run.next_step().await? {
            if let Some(sink) = sink {
                sink.report(&progress);
            }
        }

        let report = run.into_report();
        info!(
            indexed = report.indexed,
            nothing_to_index = report.nothing_to_index,
            skipped = report.skipped,
            "Resync completed"
        );

        Ok(report)
    }
}
