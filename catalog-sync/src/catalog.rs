//! File-backed content repository.
//!
//! Reads a JSON array of entity snapshots, one per entity and site, and
//! serves them to the synchronizer. Rendered content is taken from each
//! snapshot as is.

use std::path::Path;

use async_trait::async_trait;
use catalog_sync_pipeline::{ContentRepository, SyncError};
use catalog_sync_shared::{Entity, EntityKind, Site};
use tracing::info;

use crate::IndexingError;

pub struct JsonCatalogRepository {
    entities: Vec<Entity>,
}

impl JsonCatalogRepository {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Load a catalog file. A missing file yields an empty catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexingError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Catalog file not found, starting with an empty catalog");
            return Ok(Self::new(Vec::new()));
        }

        let raw = std::fs::read_to_string(path)?;
        let entities: Vec<Entity> = serde_json::from_str(&raw)?;

        info!(path = %path.display(), entities = entities.len(), "Catalog loaded");
        Ok(Self::new(entities))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl ContentRepository for JsonCatalogRepository {
    async fn find_entities(
        &self,
        kind: EntityKind,
        group_handles: &[String],
        site: &Site,
    ) -> Result<Vec<Entity>, SyncError> {
        Ok(self
            .entities
            .iter()
            .filter(|e| e.kind == kind && e.site.handle == site.handle)
            .filter(|e| match e.group() {
                Some(group) => group_handles.iter().any(|h| h == group),
                None => false,
            })
            .cloned()
            .collect())
    }

    async fn resolve_localized(
        &self,
        entity: &Entity,
        site: &Site,
    ) -> Result<Option<Entity>, SyncError> {
        Ok(self
            .entities
            .iter()
            .find(|e| {
                e.id == entity.id
                    && e.kind == entity.kind
                    && e.site.handle == site.handle
                    && !e.is_draft_or_revision()
            })
            .cloned())
    }
}
