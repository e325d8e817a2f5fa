//! Synchronizer configuration.

use std::sync::Arc;

use catalog_sync_shared::{AllowLists, Site};

use crate::hooks::IndexerInitHook;

/// Index prefix used when the environment does not configure one.
pub const DEFAULT_INDEX_PREFIX: &str = "catalog";

/// Process-wide synchronizer configuration.
///
/// Built once during initialization and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SyncConfiguration {
    /// Document-store hosts for the current environment.
    pub hosts: Vec<String>,
    /// First segment of every index name.
    pub index_prefix: String,
    /// Group handles whose entities are searchable.
    pub allow_lists: AllowLists,
    /// Sites of the content repository, in processing order.
    pub sites: Vec<Site>,
}

impl SyncConfiguration {
    /// Create a configuration with empty allow-lists.
    pub fn new(hosts: Vec<String>, index_prefix: impl Into<String>, sites: Vec<Site>) -> Self {
        let index_prefix = index_prefix.into();
        Self {
            hosts,
            index_prefix: if index_prefix.is_empty() {
                DEFAULT_INDEX_PREFIX.to_string()
            } else {
                index_prefix
            },
            allow_lists: AllowLists::default(),
            sites,
        }
    }

    /// Merge the given allow-lists into the configuration.
    pub fn with_allow_lists(mut self, allow_lists: &AllowLists) -> Self {
        self.allow_lists.merge(allow_lists);
        self
    }

    /// Let every init hook contribute to the allow-lists, in order.
    pub fn with_init_hooks(mut self, hooks: &[Arc<dyn IndexerInitHook>]) -> Self {
        for hook in hooks {
            hook.contribute(&mut self.allow_lists);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_sync_shared::EntityKind;

    #[test]
    fn test_empty_prefix_falls_back_to_default() {
        let config = SyncConfiguration::new(vec![], "", vec![]);
        assert_eq!(config.index_prefix, DEFAULT_INDEX_PREFIX);
    }

    #[test]
    fn test_init_hooks_contribute_allow_lists() {
        let mut base = AllowLists::new();
        base.add(EntityKind::Document, "news");

        let hooks: Vec<Arc<dyn IndexerInitHook>> = vec![
            Arc::new(|lists: &mut AllowLists| {
                lists.add_all(EntityKind::Document, ["news", "blog"]);
            }),
            Arc::new(|lists: &mut AllowLists| lists.add(EntityKind::File, "images")),
        ];

        let config = SyncConfiguration::new(vec![], "craft", vec![])
            .with_allow_lists(&base)
            .with_init_hooks(&hooks);

        assert_eq!(config.allow_lists.documents, vec!["news", "blog"]);
        assert_eq!(config.allow_lists.files, vec!["images"]);
        assert!(config.allow_lists.categories.is_empty());
    }
}
