//! Sync engine.
//!
//! Forwards single-entity upserts and removals to the document store and
//! applies the error policy of the calling context.

mod context;
mod summary;

pub use context::{ExecutionContext, NoticeSink};
pub use summary::{RemoveResult, RemoveSummary, UpsertOutcome};

use std::sync::Arc;

use catalog_sync_repository::{ConnectionStatus, DocumentStoreGateway};
use catalog_sync_shared::Entity;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::config::SyncConfiguration;
use crate::content::ContentRepository;
use crate::eligibility::EligibilityFilter;
use crate::errors::SyncError;
use crate::hooks::BeforeIndexHook;
use crate::naming::IndexNamer;

/// Keeps the document store synchronized with entity lifecycle.
///
/// The engine is constructed once with its configuration, gateway and
/// content repository, and shared (usually behind an `Arc`) with whatever
/// needs to trigger synchronization.
pub struct SyncEngine {
    config: SyncConfiguration,
    filter: EligibilityFilter,
    namer: IndexNamer,
    gateway: Arc<dyn DocumentStoreGateway>,
    content: Arc<dyn ContentRepository>,
    before_index_hooks: Vec<Arc<dyn BeforeIndexHook>>,
}

impl SyncEngine {
    /// Create a new engine. The eligibility filter and index namer are
    /// derived from `config`.
    pub fn new(
        config: SyncConfiguration,
        gateway: Arc<dyn DocumentStoreGateway>,
        content: Arc<dyn ContentRepository>,
    ) -> Self {
        let filter = EligibilityFilter::new(config.allow_lists.clone());
        let namer = IndexNamer::new(config.index_prefix.clone());

        Self {
            config,
            filter,
            namer,
            gateway,
            content,
            before_index_hooks: Vec::new(),
        }
    }

    /// Register a hook that runs before every document is indexed.
    pub fn with_before_index_hook(mut self, hook: Arc<dyn BeforeIndexHook>) -> Self {
        self.before_index_hooks.push(hook);
        self
    }

    pub fn config(&self) -> &SyncConfiguration {
        &self.config
    }

    pub fn filter(&self) -> &EligibilityFilter {
        &self.filter
    }

    pub fn namer(&self) -> &IndexNamer {
        &self.namer
    }

    pub(crate) fn gateway(&self) -> &dyn DocumentStoreGateway {
        self.gateway.as_ref()
    }

    pub(crate) fn content(&self) -> &dyn ContentRepository {
        self.content.as_ref()
    }

    /// Ping the document store.
    pub async fn connection_status(&self) -> ConnectionStatus {
        self.gateway.ping().await
    }

    /// Index the rendered document of `entity` in its site's index.
    ///
    /// Empty content is a no-op. Failures are logged; in an interactive
    /// context they are shown to the operator and reported as
    /// [`UpsertOutcome::Failed`], in a background context they are returned.
    #[instrument(skip(self, entity, ctx), fields(entity_id = entity.id, kind = %entity.kind))]
    pub async fn upsert(
        &self,
        entity: &Entity,
        ctx: ExecutionContext<'_>,
    ) -> Result<UpsertOutcome, SyncError> {
        let content = match self.content.render_content(entity).await {
            Ok(content) => content,
            Err(e) => return Self::fail(e, ctx),
        };

        let content = self
            .before_index_hooks
            .iter()
            .fold(content, |content, hook| hook.before_index(entity, content));

        let body = match content {
            Some(body) if !is_empty_document(&body) => body,
            _ => {
                debug!("Nothing to index");
                return Ok(UpsertOutcome::NothingToIndex);
            }
        };

        let index = self.namer.name_for(entity, &entity.site);
        let id = entity.id.to_string();

        match self.gateway.index_document(&index, &id, &body).await {
            Ok(()) => {
                debug!(index = %index, "Entity indexed");
                Ok(UpsertOutcome::Indexed { index })
            }
            Err(e) => Self::fail(e.into(), ctx),
        }
    }

    /// Remove the document of `entity` from the index of every site.
    ///
    /// Unless `force` is set, each site's localized version is resolved
    /// first; sites without one, or where it is still live, are skipped.
    /// A missing document counts as deleted. Other failures are logged and,
    /// in an interactive context, shown to the operator; they never abort
    /// the removal from the remaining sites.
    #[instrument(skip(self, entity, ctx), fields(entity_id = entity.id, kind = %entity.kind))]
    pub async fn remove(
        &self,
        entity: &Entity,
        force: bool,
        ctx: ExecutionContext<'_>,
    ) -> RemoveSummary {
        let mut summary = RemoveSummary::default();

        for site in &self.config.sites {
            summary.total += 1;

            let target = if force {
                entity.clone()
            } else {
                match self.content.resolve_localized(entity, site).await {
                    Ok(Some(localized)) => localized,
                    Ok(None) => {
                        summary.skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!(site = %site.handle, error = %e, "Failed to resolve localized entity");
                        ctx.error(&e.to_string());
                        summary.skipped += 1;
                        continue;
                    }
                }
            };

            // A version that is still live in this site keeps its document
            if !force && self.filter.is_live(&target) {
                debug!(site = %site.handle, "Entity still live in site, keeping document");
                summary.skipped += 1;
                continue;
            }

            let index = self.namer.name_for(&target, site);
            let id = target.id.to_string();

            match self.gateway.delete_document(&index, &id).await {
                Ok(()) => {
                    debug!(index = %index, "Document deleted");
                    summary.record_deleted(index);
                }
                Err(e) if e.is_not_found() => {
                    debug!(index = %index, "Document already absent");
                    summary.record_not_found(index);
                }
                Err(e) => {
                    error!(index = %index, error = %e, "Failed to delete document");
                    ctx.error(&e.to_string());
                    summary.record_failed(index, e);
                }
            }
        }

        summary
    }

    /// Apply the failure policy of `ctx` to `error`.
    fn fail(error: SyncError, ctx: ExecutionContext<'_>) -> Result<UpsertOutcome, SyncError> {
        error!(error = %error, "Failed to index entity");
        match ctx {
            ExecutionContext::Interactive(sink) => {
                sink.error(&error.to_string());
                Ok(UpsertOutcome::Failed(error.to_string()))
            }
            ExecutionContext::Background => Err(error),
        }
    }
}

/// `null`, `{}` and `[]` carry nothing to index.
fn is_empty_document(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        document, test_config, GatewayCall, InMemoryContent, MockGateway, RecordingNotices,
    };
    use catalog_sync_repository::GatewayError;
    use catalog_sync_shared::{EntityStatus, Site};
    use serde_json::json;

    fn engine(gateway: Arc<MockGateway>, content: Arc<InMemoryContent>) -> SyncEngine {
        SyncEngine::new(test_config(), gateway, content)
    }

    #[tokio::test]
    async fn test_upsert_indexes_rendered_content() {
        let gateway = Arc::new(MockGateway::new());
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()));
        let entity = document(1, "news", Site::new("en", "en-US")).with_content(json!({"title": "Hi"}));

        let outcome = engine.upsert(&entity, ExecutionContext::Background).await.unwrap();

        assert_eq!(
            outcome,
            UpsertOutcome::Indexed {
                index: "craft_news_en_en-us".to_string()
            }
        );
        assert_eq!(
            gateway.calls().await,
            vec![GatewayCall::Index {
                index: "craft_news_en_en-us".to_string(),
                id: "1".to_string(),
                body: json!({"title": "Hi"}),
            }]
        );
    }

    #[tokio::test]
    async fn test_upsert_without_content_is_a_noop() {
        let gateway = Arc::new(MockGateway::new());
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()));

        let empty = document(1, "news", Site::new("en", "en-US"));
        let empty_object = empty.clone().with_content(json!({}));

        assert_eq!(
            engine.upsert(&empty, ExecutionContext::Background).await.unwrap(),
            UpsertOutcome::NothingToIndex
        );
        assert_eq!(
            engine.upsert(&empty_object, ExecutionContext::Background).await.unwrap(),
            UpsertOutcome::NothingToIndex
        );
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_before_index_hook_transforms_and_vetoes() {
        let gateway = Arc::new(MockGateway::new());
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()))
            .with_before_index_hook(Arc::new(|entity: &Entity, content: Option<Value>| {
                if entity.slug == "secret" {
                    return None;
                }
                content.map(|mut body| {
                    body["site"] = json!(entity.site.handle);
                    body
                })
            }));

        let site = Site::new("en", "en-US");
        let public = document(1, "news", site.clone())
            .with_slug("public")
            .with_content(json!({"title": "Public"}));
        let secret = document(2, "news", site)
            .with_slug("secret")
            .with_content(json!({"title": "Secret"}));

        engine.upsert(&public, ExecutionContext::Background).await.unwrap();
        let outcome = engine.upsert(&secret, ExecutionContext::Background).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::NothingToIndex);
        let calls = gateway.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            GatewayCall::Index { body, .. } if body["site"] == "en"
        ));
    }

    #[tokio::test]
    async fn test_upsert_failure_is_returned_in_background() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_index_with(GatewayError::connection("refused")).await;
        let engine = engine(gateway, Arc::new(InMemoryContent::new()));
        let entity = document(1, "news", Site::new("en", "en-US")).with_content(json!({"a": 1}));

        let result = engine.upsert(&entity, ExecutionContext::Background).await;

        assert!(matches!(result, Err(SyncError::Gateway(GatewayError::ConnectionError(_)))));
    }

    #[tokio::test]
    async fn test_upsert_failure_is_surfaced_interactively() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_index_with(GatewayError::connection("refused")).await;
        let engine = engine(gateway, Arc::new(InMemoryContent::new()));
        let notices = RecordingNotices::default();
        let entity = document(1, "news", Site::new("en", "en-US")).with_content(json!({"a": 1}));

        let outcome = engine
            .upsert(&entity, ExecutionContext::Interactive(&notices))
            .await
            .unwrap();

        assert!(matches!(outcome, UpsertOutcome::Failed(_)));
        let errors = notices.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("refused"));
    }

    #[tokio::test]
    async fn test_upsert_twice_leaves_the_same_document() {
        let gateway = Arc::new(MockGateway::new());
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()));
        let entity = document(1, "news", Site::new("en", "en-US")).with_content(json!({"a": 1}));

        engine.upsert(&entity, ExecutionContext::Background).await.unwrap();
        let once = gateway.documents().await;
        engine.upsert(&entity, ExecutionContext::Background).await.unwrap();

        assert_eq!(gateway.documents().await, once);
    }

    #[tokio::test]
    async fn test_forced_remove_deletes_from_every_site() {
        let gateway = Arc::new(MockGateway::new());
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()));
        let entity = document(1, "news", Site::new("en", "en-US"));

        let summary = engine.remove(&entity, true, ExecutionContext::Background).await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.not_found, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            gateway.calls().await,
            vec![
                GatewayCall::Delete {
                    index: "craft_news_en_en-us".to_string(),
                    id: "1".to_string()
                },
                GatewayCall::Delete {
                    index: "craft_news_de_de-de".to_string(),
                    id: "1".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_forced_remove_is_idempotent() {
        let gateway = Arc::new(MockGateway::new());
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()));
        let en = Site::new("en", "en-US");
        let entity = document(1, "news", en).with_content(json!({"a": 1}));
        engine.upsert(&entity, ExecutionContext::Background).await.unwrap();

        let first = engine.remove(&entity, true, ExecutionContext::Background).await;
        let second = engine.remove(&entity, true, ExecutionContext::Background).await;

        assert_eq!(first.deleted, 1);
        assert_eq!(second.deleted, 0);
        assert_eq!(second.failed, 0);
        assert!(gateway.documents().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_keeps_document_where_still_live() {
        let gateway = Arc::new(MockGateway::new());
        let en = Site::new("en", "en-US");
        let de = Site::new("de", "de-DE");
        let content = Arc::new(InMemoryContent::with_entities(vec![
            document(1, "news", en.clone()).with_status(EntityStatus::Disabled),
            document(1, "news", de),
        ]));
        let engine = engine(gateway.clone(), content);
        let disabled = document(1, "news", en).with_status(EntityStatus::Disabled);

        let summary = engine.remove(&disabled, false, ExecutionContext::Background).await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(
            gateway.calls().await,
            vec![GatewayCall::Delete {
                index: "craft_news_en_en-us".to_string(),
                id: "1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_remove_skips_sites_without_localized_version() {
        let gateway = Arc::new(MockGateway::new());
        let en = Site::new("en", "en-US");
        let disabled = document(1, "news", en).with_status(EntityStatus::Disabled);
        let content = Arc::new(InMemoryContent::with_entities(vec![disabled.clone()]));
        let engine = engine(gateway.clone(), content);

        let summary = engine.remove(&disabled, false, ExecutionContext::Background).await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(gateway.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_failures_are_absorbed() {
        let gateway = Arc::new(MockGateway::new());
        gateway
            .fail_delete_with(GatewayError::Unavailable {
                status: 503,
                message: "busy".to_string(),
            })
            .await;
        let engine = engine(gateway.clone(), Arc::new(InMemoryContent::new()));
        let notices = RecordingNotices::default();
        let entity = document(1, "news", Site::new("en", "en-US"));

        let summary = engine
            .remove(&entity, true, ExecutionContext::Interactive(&notices))
            .await;

        // both sites were attempted despite the first failure
        assert_eq!(gateway.calls().await.len(), 2);
        assert_eq!(summary.failed, 2);
        assert!(summary.results.iter().all(|r| !r.success));
        assert_eq!(notices.errors().len(), 2);
    }

    #[test]
    fn test_is_empty_document() {
        assert!(is_empty_document(&Value::Null));
        assert!(is_empty_document(&json!({})));
        assert!(is_empty_document(&json!([])));
        assert!(is_empty_document(&json!("")));
        assert!(!is_empty_document(&json!({"a": 1})));
        assert!(!is_empty_document(&json!(0)));
    }
}
