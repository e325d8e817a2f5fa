use std::collections::VecDeque;

use catalog_sync_shared::{Entity, EntityKind, Site, SyncProgress};
use tracing::debug;

use super::ResyncReport;
use crate::engine::{ExecutionContext, SyncEngine, UpsertOutcome};
use crate::errors::SyncError;

const COMPLETE_LABEL: &str = "complete";

/// The index phase of a resync, one entity per step.
///
/// Each call to [`next_step`](ResyncRun::next_step) upserts one entity and
/// returns the checkpoint reached. Sites are loaded lazily, so a run that is
/// dropped early never enumerates the remaining sites. Dropping a run
/// cancels it; documents already written stay in place.
pub struct ResyncRun<'a> {
    engine: &'a SyncEngine,
    site_index: usize,
    loaded: bool,
    pending: VecDeque<Entity>,
    site_total: usize,
    site_position: usize,
    last_fraction: f64,
    finished: bool,
    report: ResyncReport,
}

impl<'a> ResyncRun<'a> {
    pub(crate) fn new(engine: &'a SyncEngine, report: ResyncReport) -> Self {
        Self {
            engine,
            site_index: 0,
            loaded: false,
            pending: VecDeque::new(),
            site_total: 0,
            site_position: 0,
            last_fraction: 0.0,
            finished: false,
            report,
        }
    }

    /// Process the next entity.
    ///
    /// Returns `Ok(None)` once the run is exhausted. A run whose last step
    /// did not reach `1.0` (no entities in the last site) yields a closing
    /// checkpoint at `1.0` first.
    pub async fn next_step(&mut self) -> Result<Option<SyncProgress>, SyncError> {
        loop {
            if self.finished {
                return Ok(None);
            }

            if let Some(entity) = self.pending.pop_front() {
                return self.process(entity).await.map(Some);
            }

            if self.loaded {
                self.site_index += 1;
                self.loaded = false;
            }

            let Some(site) = self.sites().get(self.site_index).cloned() else {
                self.finished = true;
                if self.last_fraction < 1.0 {
                    self.last_fraction = 1.0;
                    return Ok(Some(SyncProgress::new(1.0, COMPLETE_LABEL)));
                }
                return Ok(None);
            };

            self.load_site(&site).await?;
        }
    }

    /// Counters collected so far.
    pub fn report(&self) -> &ResyncReport {
        &self.report
    }

    pub fn into_report(self) -> ResyncReport {
        self.report
    }

    fn sites(&self) -> &'a [Site] {
        &self.engine.config().sites
    }

    async fn load_site(&mut self, site: &Site) -> Result<(), SyncError> {
        let filter = self.engine.filter();

        for kind in EntityKind::ALL {
            let handles = filter.allow_lists().for_kind(kind);
            if handles.is_empty() {
                continue;
            }

            let entities = self
                .engine
                .content()
                .find_entities(kind, handles, site)
                .await?;

            for entity in entities {
                if !entity.is_draft_or_revision()
                    && filter.is_eligible(&entity)
                    && filter.is_live(&entity)
                {
                    self.pending.push_back(entity);
                } else {
                    self.report.skipped += 1;
                }
            }
        }

        self.site_total = self.pending.len();
        self.site_position = 0;
        self.loaded = true;

        debug!(site = %site.handle, entities = self.site_total, "Loaded site");
        Ok(())
    }

    async fn process(&mut self, entity: Entity) -> Result<SyncProgress, SyncError> {
        match self
            .engine
            .upsert(&entity, ExecutionContext::Background)
            .await?
        {
            UpsertOutcome::Indexed { .. } => self.report.indexed += 1,
            UpsertOutcome::NothingToIndex => self.report.nothing_to_index += 1,
            UpsertOutcome::Failed(_) => {}
        }

        self.site_position += 1;

        // (site_index + position / total) / sites, kept in integers so the
        // last step of the last site lands exactly on 1.0
        let sites = self.sites().len();
        let numerator = self.site_index * self.site_total + self.site_position;
        let denominator = self.site_total * sites;
        let fraction = numerator as f64 / denominator as f64;
        self.last_fraction = fraction;

        let site_name = self.sites()[self.site_index].display_name();
        Ok(SyncProgress::new(
            fraction,
            format!("{} | {}", site_name, entity.label()),
        ))
    }
}
