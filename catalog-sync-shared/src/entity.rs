//! Entity definitions.
//!
//! An [`Entity`] is a snapshot of a content item owned by the content
//! repository. The synchronizer only reads and forwards it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Site;

/// The closed set of entity kinds the synchronizer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A regular document belonging to a section.
    Document,
    /// A category belonging to a category group.
    Category,
    /// A file belonging to a volume.
    File,
}

impl EntityKind {
    /// All kinds, in resync processing order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Document, EntityKind::Category, EntityKind::File];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Document => "document",
            EntityKind::Category => "category",
            EntityKind::File => "file",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    /// Published and currently visible (documents).
    Live,
    /// Enabled (categories and other non-document kinds).
    Enabled,
    /// Scheduled for a future publication date.
    Pending,
    /// Past its expiry date.
    Expired,
    /// Switched off by an editor.
    Disabled,
    /// Unpublished working copy.
    Draft,
    /// Historical snapshot.
    Revision,
}

/// Which copy of an entity a snapshot describes.
///
/// Editors work on draft copies and the repository keeps revision copies;
/// neither ever takes part in synchronization. A canonical entity whose
/// status is [`EntityStatus::Draft`] is a different thing: it exists, but is
/// not live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityVersion {
    #[default]
    Canonical,
    Draft,
    Revision,
}

/// A content item as supplied by the content repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier, shared by all localized versions of the entity.
    pub id: u64,
    /// What sort of content item this is.
    pub kind: EntityKind,
    /// Handle of the section, category group or volume the entity belongs to.
    #[serde(default)]
    pub group_handle: Option<String>,
    /// The site this snapshot was loaded for.
    pub site: Site,
    /// Publication status in `site`.
    pub status: EntityStatus,
    /// Canonical entity, or a draft or revision copy of one.
    #[serde(default)]
    pub version: EntityVersion,
    /// Slug or file name, used in progress labels.
    #[serde(default)]
    pub slug: String,
    /// Rendered search document. `None` means there is nothing to index.
    #[serde(default)]
    pub content: Option<Value>,
}

impl Entity {
    /// Create a live entity without content.
    pub fn new(id: u64, kind: EntityKind, group_handle: impl Into<String>, site: Site) -> Self {
        Self {
            id,
            kind,
            group_handle: Some(group_handle.into()),
            site,
            status: EntityStatus::Live,
            version: EntityVersion::Canonical,
            slug: String::new(),
            content: None,
        }
    }

    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_version(mut self, version: EntityVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }

    /// Drafts and revisions never take part in synchronization.
    pub fn is_draft_or_revision(&self) -> bool {
        self.version != EntityVersion::Canonical
    }

    /// The group handle, treating an empty string like a missing one.
    pub fn group(&self) -> Option<&str> {
        self.group_handle.as_deref().filter(|h| !h.is_empty())
    }

    /// The slug, or `#<id>` when the entity has none.
    pub fn label(&self) -> String {
        if self.slug.is_empty() {
            format!("#{}", self.id)
        } else {
            self.slug.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_group_handle_is_treated_as_missing() {
        let mut entity = Entity::new(1, EntityKind::Document, "", Site::new("en", "en-US"));
        assert!(entity.group().is_none());

        entity.group_handle = None;
        assert!(entity.group().is_none());

        entity.group_handle = Some("news".to_string());
        assert_eq!(entity.group(), Some("news"));
    }

    #[test]
    fn test_deserialize_entity() {
        let entity: Entity = serde_json::from_value(json!({
            "id": 42,
            "kind": "category",
            "group_handle": "topics",
            "site": { "handle": "en", "language": "en-US" },
            "status": "enabled",
            "slug": "rust",
            "content": { "title": "Rust" }
        }))
        .unwrap();

        assert_eq!(entity.kind, EntityKind::Category);
        assert_eq!(entity.status, EntityStatus::Enabled);
        assert_eq!(entity.version, EntityVersion::Canonical);
        assert_eq!(entity.label(), "rust");
        assert_eq!(entity.content, Some(json!({ "title": "Rust" })));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let entity = Entity::new(7, EntityKind::File, "images", Site::new("en", "en-US"));
        assert_eq!(entity.label(), "#7");
    }

    #[test]
    fn test_draft_or_revision_depends_on_version_not_status() {
        let site = Site::new("en", "en-US");
        let draft_status =
            Entity::new(1, EntityKind::Document, "news", site.clone()).with_status(EntityStatus::Draft);
        assert!(!draft_status.is_draft_or_revision());

        let draft_copy =
            Entity::new(1, EntityKind::Document, "news", site.clone()).with_version(EntityVersion::Draft);
        assert!(draft_copy.is_draft_or_revision());

        let revision = Entity::new(1, EntityKind::Document, "news", site).with_version(EntityVersion::Revision);
        assert!(revision.is_draft_or_revision());
    }
}
