//! Eligibility and liveness predicates.

use catalog_sync_shared::{AllowLists, Entity, EntityKind, EntityStatus};

/// Decides whether an entity belongs in the search index at all, and whether
/// it is currently live.
///
/// Both predicates are pure functions of the entity snapshot.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    allow_lists: AllowLists,
}

impl EligibilityFilter {
    pub fn new(allow_lists: AllowLists) -> Self {
        Self { allow_lists }
    }

    pub fn allow_lists(&self) -> &AllowLists {
        &self.allow_lists
    }

    /// True iff the entity's group handle is non-empty and allow-listed for its kind.
    pub fn is_eligible(&self, entity: &Entity) -> bool {
        match entity.group() {
            Some(handle) => self.allow_lists.contains(entity.kind, handle),
            None => false,
        }
    }

    /// Files are always live, documents when published, everything else when enabled.
    pub fn is_live(&self, entity: &Entity) -> bool {
        match entity.kind {
            EntityKind::File => true,
            EntityKind::Document => entity.status == EntityStatus::Live,
            EntityKind::Category => entity.status == EntityStatus::Enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_sync_shared::Site;

    fn filter() -> EligibilityFilter {
        let mut lists = AllowLists::new();
        lists.add(EntityKind::Document, "news");
        lists.add(EntityKind::Category, "topics");
        lists.add(EntityKind::File, "images");
        EligibilityFilter::new(lists)
    }

    fn entity(kind: EntityKind, handle: &str) -> Entity {
        Entity::new(1, kind, handle, Site::new("en", "en-US"))
    }

    #[test]
    fn test_allow_listed_handles_are_eligible() {
        let filter = filter();
        assert!(filter.is_eligible(&entity(EntityKind::Document, "news")));
        assert!(filter.is_eligible(&entity(EntityKind::Category, "topics")));
        assert!(filter.is_eligible(&entity(EntityKind::File, "images")));
    }

    #[test]
    fn test_handles_are_checked_per_kind() {
        let filter = filter();
        assert!(!filter.is_eligible(&entity(EntityKind::Category, "news")));
        assert!(!filter.is_eligible(&entity(EntityKind::Document, "images")));
        assert!(!filter.is_eligible(&entity(EntityKind::Document, "blog")));
    }

    #[test]
    fn test_missing_or_empty_group_is_never_eligible() {
        let mut lists = AllowLists::new();
        lists.documents.push(String::new());
        let filter = EligibilityFilter::new(lists);

        let mut orphan = entity(EntityKind::Document, "");
        assert!(!filter.is_eligible(&orphan));

        orphan.group_handle = None;
        assert!(!filter.is_eligible(&orphan));
    }

    #[test]
    fn test_document_liveness() {
        let filter = filter();
        let document = entity(EntityKind::Document, "news");

        assert!(filter.is_live(&document.clone().with_status(EntityStatus::Live)));
        assert!(!filter.is_live(&document.clone().with_status(EntityStatus::Enabled)));
        assert!(!filter.is_live(&document.clone().with_status(EntityStatus::Pending)));
        assert!(!filter.is_live(&document.with_status(EntityStatus::Draft)));
    }

    #[test]
    fn test_category_liveness() {
        let filter = filter();
        let category = entity(EntityKind::Category, "topics");

        assert!(filter.is_live(&category.clone().with_status(EntityStatus::Enabled)));
        assert!(!filter.is_live(&category.with_status(EntityStatus::Disabled)));
    }

    #[test]
    fn test_files_are_always_live() {
        let filter = filter();
        let file = entity(EntityKind::File, "images").with_status(EntityStatus::Disabled);
        assert!(filter.is_live(&file));
    }
}
