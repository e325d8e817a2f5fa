//! Per-kind allow-lists of group handles.

use serde::{Deserialize, Serialize};

use crate::EntityKind;

/// Group handles whose entities are searchable, one list per [`EntityKind`].
///
/// Handles are kept in insertion order, without duplicates or empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowLists {
    /// Section handles of searchable documents.
    #[serde(default)]
    pub documents: Vec<String>,
    /// Group handles of searchable categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Volume handles of searchable files.
    #[serde(default)]
    pub files: Vec<String>,
}

impl AllowLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handles configured for `kind`.
    pub fn for_kind(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Document => &self.documents,
            EntityKind::Category => &self.categories,
            EntityKind::File => &self.files,
        }
    }

    fn for_kind_mut(&mut self, kind: EntityKind) -> &mut Vec<String> {
        match kind {
            EntityKind::Document => &mut self.documents,
            EntityKind::Category => &mut self.categories,
            EntityKind::File => &mut self.files,
        }
    }

    /// Add a handle for `kind`. Empty and already present handles are ignored.
    pub fn add(&mut self, kind: EntityKind, handle: impl Into<String>) {
        let handle = handle.into();
        let handles = self.for_kind_mut(kind);
        if !handle.is_empty() && !handles.contains(&handle) {
            handles.push(handle);
        }
    }

    /// Add several handles for `kind`.
    pub fn add_all<I, S>(&mut self, kind: EntityKind, handles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for handle in handles {
            self.add(kind, handle);
        }
    }

    /// Merge every handle of `other` into `self`.
    pub fn merge(&mut self, other: &AllowLists) {
        for kind in EntityKind::ALL {
            self.add_all(kind, other.for_kind(kind).iter().cloned());
        }
    }

    /// Whether `handle` is a non-empty member of the list for `kind`.
    pub fn contains(&self, kind: EntityKind, handle: &str) -> bool {
        !handle.is_empty() && self.for_kind(kind).iter().any(|h| h == handle)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.categories.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_skips_duplicates_and_empty_handles() {
        let mut lists = AllowLists::new();
        lists.add_all(EntityKind::Document, ["news", "", "news", "blog"]);

        assert_eq!(lists.documents, vec!["news".to_string(), "blog".to_string()]);
        assert!(lists.categories.is_empty());
    }

    #[test]
    fn test_contains_is_per_kind() {
        let mut lists = AllowLists::new();
        lists.add(EntityKind::Category, "topics");

        assert!(lists.contains(EntityKind::Category, "topics"));
        assert!(!lists.contains(EntityKind::Document, "topics"));
        assert!(!lists.contains(EntityKind::Category, ""));
    }

    #[test]
    fn test_merge() {
        let mut base = AllowLists::new();
        base.add(EntityKind::File, "images");

        let mut other = AllowLists::new();
        other.add(EntityKind::File, "images");
        other.add(EntityKind::File, "documents");
        other.add(EntityKind::Document, "news");

        base.merge(&other);

        assert_eq!(base.files, vec!["images".to_string(), "documents".to_string()]);
        assert_eq!(base.documents, vec!["news".to_string()]);
        assert!(!base.is_empty());
    }
}
