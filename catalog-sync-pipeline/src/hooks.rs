//! Extensibility hooks.
//!
//! Collaborators can contribute allow-list entries while the configuration is
//! built, and transform or drop a document right before it is indexed.

use catalog_sync_shared::{AllowLists, Entity};
use serde_json::Value;

/// Contributes allow-list entries while the [`SyncConfiguration`] is built.
///
/// [`SyncConfiguration`]: crate::SyncConfiguration
pub trait IndexerInitHook: Send + Sync {
    fn contribute(&self, allow_lists: &mut AllowLists);
}

impl<F> IndexerInitHook for F
where
    F: Fn(&mut AllowLists) + Send + Sync,
{
    fn contribute(&self, allow_lists: &mut AllowLists) {
        self(allow_lists)
    }
}

/// Runs before a document is sent to the document store.
///
/// Returning `None` (or an empty object) vetoes indexing of the entity.
pub trait BeforeIndexHook: Send + Sync {
    fn before_index(&self, entity: &Entity, content: Option<Value>) -> Option<Value>;
}

impl<F> BeforeIndexHook for F
where
    F: Fn(&Entity, Option<Value>) -> Option<Value> + Send + Sync,
{
    fn before_index(&self, entity: &Entity, content: Option<Value>) -> Option<Value> {
        self(entity, content)
    }
}
