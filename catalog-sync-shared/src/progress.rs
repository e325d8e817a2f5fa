//! Progress checkpoints emitted during a resync.

/// A resync checkpoint: how far the run is, and what was just processed.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncProgress {
    /// Completed fraction, always within `[0, 1]`.
    pub fraction: f64,
    /// Label such as `English | my-first-post`.
    pub label: String,
}

impl SyncProgress {
    /// Create a checkpoint, clamping the fraction into `[0, 1]`.
    ///
    /// Non-finite fractions are reported as `0.0`.
    pub fn new(fraction: f64, label: impl Into<String>) -> Self {
        let fraction = if !fraction.is_finite() || fraction < 0.0 {
            0.0
        } else if fraction > 1.0 {
            1.0
        } else {
            fraction
        };

        Self {
            fraction,
            label: label.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.fraction >= 1.0
    }
}
