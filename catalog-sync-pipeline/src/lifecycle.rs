//! Entity lifecycle routing.
//!
//! Lifecycle events arrive one at a time from the content repository. Each is
//! planned into an [`LifecycleAction`] by a pure function and then executed
//! against the engine.

use std::fmt;

use catalog_sync_shared::Entity;
use tracing::{debug, instrument};

use crate::eligibility::EligibilityFilter;
use crate::engine::{ExecutionContext, RemoveSummary, SyncEngine, UpsertOutcome};
use crate::errors::SyncError;

/// A change to an entity reported by the content repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created,
    Updated,
    Restored,
    Deleted,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleEvent::Created => "created",
            LifecycleEvent::Updated => "updated",
            LifecycleEvent::Restored => "restored",
            LifecycleEvent::Deleted => "deleted",
        };
        f.write_str(name)
    }
}

/// Why an event did not touch the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    DraftOrRevision,
    NotEligible,
}

/// What an event does to the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Index,
    Remove { force: bool },
    Ignore(IgnoreReason),
}

/// The result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Indexed(UpsertOutcome),
    Removed(RemoveSummary),
    Ignored(IgnoreReason),
}

/// Decide what `event` on `entity` does.
///
/// Draft and revision copies are dropped before eligibility is evaluated.
/// A deletion removes unconditionally; any other event indexes a live
/// entity and removes one that is not live.
pub fn plan(filter: &EligibilityFilter, event: LifecycleEvent, entity: &Entity) -> LifecycleAction {
    if entity.is_draft_or_revision() {
        return LifecycleAction::Ignore(IgnoreReason::DraftOrRevision);
    }

    if !filter.is_eligible(entity) {
        return LifecycleAction::Ignore(IgnoreReason::NotEligible);
    }

    match event {
        LifecycleEvent::Deleted => LifecycleAction::Remove { force: true },
        LifecycleEvent::Created | LifecycleEvent::Updated | LifecycleEvent::Restored => {
            if filter.is_live(entity) {
                LifecycleAction::Index
            } else {
                LifecycleAction::Remove { force: false }
            }
        }
    }
}

impl SyncEngine {
    /// Route a lifecycle event to an upsert or a removal.
    ///
    /// Errors only come back from upserts in a background context.
    #[instrument(skip(self, entity, ctx), fields(entity_id = entity.id, kind = %entity.kind))]
    pub async fn handle_event(
        &self,
        event: LifecycleEvent,
        entity: &Entity,
        ctx: ExecutionContext<'_>,
    ) -> Result<LifecycleOutcome, SyncError> {
        match plan(self.filter(), event, entity) {
            LifecycleAction::Index => self.upsert(entity, ctx).await.map(LifecycleOutcome::Indexed),
            LifecycleAction::Remove { force } => Ok(LifecycleOutcome::Removed(
                self.remove(entity, force, ctx).await,
            )),
            LifecycleAction::Ignore(reason) => {
                debug!(event = %event, ?reason, "Ignoring lifecycle event");
                Ok(LifecycleOutcome::Ignored(reason))
            }
        }
    }

    pub async fn on_entity_created(
        &self,
        entity: &Entity,
        ctx: ExecutionContext<'_>,
    ) -> Result<LifecycleOutcome, SyncError> {
        self.handle_event(LifecycleEvent::Created, entity, ctx).await
    }

    pub async fn on_entity_updated(
        &self,
        entity: &Entity,
        ctx: ExecutionContext<'_>,
    ) -> Result<LifecycleOutcome, SyncError> {
        self.handle_event(LifecycleEvent::Updated, entity, ctx).await
    }

    pub async fn on_entity_restored(
        &self,
        entity: &Entity,
        ctx: ExecutionContext<'_>,
    ) -> Result<LifecycleOutcome, SyncError> {
        self.handle_event(LifecycleEvent::Restored, entity, ctx).await
    }

    pub async fn on_entity_deleted(
        &self,
        entity: &Entity,
        ctx: ExecutionContext<'_>,
    ) -> Result<LifecycleOutcome, SyncError> {
        self.handle_event(LifecycleEvent::Deleted, entity, ctx).await
    }
}
