//! Outcomes of single-entity operations.

use catalog_sync_repository::GatewayError;

/// Result of [`SyncEngine::upsert`](super::SyncEngine::upsert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document was written to `index`.
    Indexed { index: String },
    /// The rendered content was empty; nothing was written.
    NothingToIndex,
    /// Indexing failed and the failure was shown to the operator.
    Failed(String),
}

/// Result of removing an entity's document from one site's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveResult {
    pub index: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Summary of a removal across all sites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveSummary {
    /// Sites considered.
    pub total: usize,
    /// Documents deleted.
    pub deleted: usize,
    /// Deletes answered with "not found". Counted as success.
    pub not_found: usize,
    /// Sites without a localized version, or where the entity is still live.
    pub skipped: usize,
    /// Deletes that failed.
    pub failed: usize,
    /// Per-index results, in site order.
    pub results: Vec<RemoveResult>,
}

impl RemoveSummary {
    pub(crate) fn record_deleted(&mut self, index: String) {
        self.deleted += 1;
        self.results.push(RemoveResult {
            index,
            success: true,
            error: None,
        });
    }

    pub(crate) fn record_not_found(&mut self, index: String) {
        self.not_found += 1;
        self.results.push(RemoveResult {
            index,
            success: true,
            error: None,
        });
    }

    pub(crate) fn record_failed(&mut self, index: String, error: GatewayError) {
        self.failed += 1;
        self.results.push(RemoveResult {
            index,
            success: false,
            error: Some(error.to_string()),
        });
    }

    /// Whether every attempted delete succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
