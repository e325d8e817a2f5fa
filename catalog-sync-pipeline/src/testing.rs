//! Test doubles shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use catalog_sync_repository::{ConnectionStatus, DocumentStoreGateway, GatewayError};
use catalog_sync_shared::{AllowLists, Entity, EntityKind, EntityStatus, Site};
use serde_json::Value;
use tokio::sync::{Mutex, Semaphore};

use crate::config::SyncConfiguration;
use crate::content::ContentRepository;
use crate::engine::NoticeSink;
use crate::errors::SyncError;

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Index { index: String, id: String, body: Value },
    Delete { index: String, id: String },
    DeleteIndex { index: String, ignore_missing: bool },
    Clear { index: String },
}

/// In-memory document store that records every call.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    documents: Mutex<BTreeMap<(String, String), Value>>,
    fail_index: Mutex<Option<GatewayError>>,
    fail_delete: Mutex<Option<GatewayError>>,
    fail_clear: Mutex<Option<GatewayError>>,
    index_gate: Option<Arc<Semaphore>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `index_document` call consumes one permit of `gate` first.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            index_gate: Some(gate),
            ..Self::default()
        }
    }

    pub async fn fail_index_with(&self, error: GatewayError) {
        *self.fail_index.lock().await = Some(error);
    }

    pub async fn fail_delete_with(&self, error: GatewayError) {
        *self.fail_delete.lock().await = Some(error);
    }

    pub async fn fail_clear_with(&self, error: GatewayError) {
        *self.fail_clear.lock().await = Some(error);
    }

    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().await.clone()
    }

    pub async fn documents(&self) -> BTreeMap<(String, String), Value> {
        self.documents.lock().await.clone()
    }

    async fn drop_index(&self, index: &str) {
        self.documents.lock().await.retain(|(i, _), _| i != index);
    }
}

#[async_trait]
impl DocumentStoreGateway for MockGateway {
    async fn index_document(&self, index: &str, id: &str, body: &Value) -> Result<(), GatewayError> {
        if let Some(gate) = &self.index_gate {
            gate.acquire().await.unwrap().forget();
        }
        self.calls.lock().await.push(GatewayCall::Index {
            index: index.to_string(),
            id: id.to_string(),
            body: body.clone(),
        });
        if let Some(e) = self.fail_index.lock().await.clone() {
            return Err(e);
        }
        self.documents
            .lock()
            .await
            .insert((index.to_string(), id.to_string()), body.clone());
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), GatewayError> {
        self.calls.lock().await.push(GatewayCall::Delete {
            index: index.to_string(),
            id: id.to_string(),
        });
        if let Some(e) = self.fail_delete.lock().await.clone() {
            return Err(e);
        }
        match self
            .documents
            .lock()
            .await
            .remove(&(index.to_string(), id.to_string()))
        {
            Some(_) => Ok(()),
            None => Err(GatewayError::not_found(index, id)),
        }
    }

    async fn delete_index(&self, index: &str, ignore_missing: bool) -> Result<(), GatewayError> {
        self.calls.lock().await.push(GatewayCall::DeleteIndex {
            index: index.to_string(),
            ignore_missing,
        });
        if let Some(e) = self.fail_clear.lock().await.clone() {
            return Err(e);
        }
        self.drop_index(index).await;
        Ok(())
    }

    async fn clear_index_contents(&self, index: &str) -> Result<(), GatewayError> {
        self.calls.lock().await.push(GatewayCall::Clear {
            index: index.to_string(),
        });
        if let Some(e) = self.fail_clear.lock().await.clone() {
            return Err(e);
        }
        self.drop_index(index).await;
        Ok(())
    }

    async fn ping(&self) -> ConnectionStatus {
        ConnectionStatus::Connected
    }

    async fn put_index_template(&self, _name: &str, _template: &Value) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn put_search_template(
        &self,
        _handle: &str,
        _source: &Value,
        _params: Option<&Value>,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn put_index_settings(
        &self,
        _index: &str,
        _settings: &Value,
        _close_and_open: bool,
    ) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Content repository backed by a list of entity snapshots.
#[derive(Default)]
pub struct InMemoryContent {
    entities: Vec<Entity>,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContent {
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
            .filter(|e| e.group().is_some_and(|g| group_handles.iter().any(|h| h == g)))
            .cloned()
            .collect())
    }

    async fn resolve_localized(&self, entity: &Entity, site: &Site) -> Result<Option<Entity>, SyncError> {
        Ok(self
            .entities
            .iter()
            .find(|e| e.id == entity.id && e.kind == entity.kind && e.site.handle == site.handle)
            .cloned())
    }
}

/// Collects operator notices.
#[derive(Default)]
pub struct RecordingNotices {
    notices: StdMutex<Vec<String>>,
    errors: StdMutex<Vec<String>>,
}

impl RecordingNotices {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl NoticeSink for RecordingNotices {
    fn notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Prefix `craft`, sites `en`/`de`, documents in `news`, categories in `topics`.
pub fn test_config() -> SyncConfiguration {
    let mut lists = AllowLists::new();
    lists.add(EntityKind::Document, "news");
    lists.add(EntityKind::Category, "topics");

    SyncConfiguration::new(
        vec!["http://localhost:9200".to_string()],
        "craft",
        vec![Site::new("en", "en-US"), Site::new("de", "de-DE")],
    )
    .with_allow_lists(&lists)
}

pub fn document(id: u64, group: &str, site: Site) -> Entity {
    Entity::new(id, EntityKind::Document, group, site)
}

pub fn category(id: u64, group: &str, site: Site) -> Entity {
    Entity::new(id, EntityKind::Category, group, site).with_status(EntityStatus::Enabled)
}

pub fn file(id: u64, group: &str, site: Site) -> Entity {
    Entity::new(id, EntityKind::File, group, site).with_status(EntityStatus::Enabled)
}
