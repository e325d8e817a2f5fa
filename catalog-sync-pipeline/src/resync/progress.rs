//! Progress sinks for resync runs.

use catalog_sync_shared::SyncProgress;
use tracing::info;

/// Receives the checkpoints of a resync run.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &SyncProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&SyncProgress) + Send + Sync,
{
    fn report(&self, progress: &SyncProgress) {
        self(progress)
    }
}

/// Logs every checkpoint at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&self, progress: &SyncProgress) {
        info!(
            percent = %format!("{:.1}", progress.fraction * 100.0),
            label = %progress.label,
            "Resync progress"
        );
    }
}
