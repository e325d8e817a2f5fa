//! Content repository interface.
//!
//! The content repository owns every entity. The synchronizer only asks it
//! to enumerate entities, to resolve localized versions, and to render the
//! search document of an entity.

use async_trait::async_trait;
use catalog_sync_shared::{Entity, EntityKind, Site};
use serde_json::Value;

use crate::errors::SyncError;

/// Abstracts the content repository the synchronizer reads from.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All entities of `kind` in `site` whose group handle is one of `group_handles`.
    async fn find_entities(
        &self,
        kind: EntityKind,
        group_handles: &[String],
        site: &Site,
    ) -> Result<Vec<Entity>, SyncError>;

    /// The version of `entity` that belongs to `site`, if there is one.
    async fn resolve_localized(
        &self,
        entity: &Entity,
        site: &Site,
    ) -> Result<Option<Entity>, SyncError>;

    /// Render the search document of `entity`.
    ///
    /// The default uses the content the repository attached to the entity.
    async fn render_content(&self, entity: &Entity) -> Result<Option<Value>, SyncError> {
        Ok(entity.content.clone())
    }
}
