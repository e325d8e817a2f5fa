//! Index naming.
//!
//! Index names are `<prefix>[_<kind>]_<group>_<site>_<language>`. The layout is
//! shared with every index already created in the document store: changing it
//! requires deleting and rebuilding all indices.

use std::collections::BTreeSet;

use catalog_sync_shared::{AllowLists, Entity, EntityKind, Site};

/// Segment inserted for categories.
pub const CATEGORY_SEGMENT: &str = "cat";

/// Segment inserted for files.
pub const FILE_SEGMENT: &str = "file";

const SEPARATOR: &str = "_";

/// Derives index names from an entity's kind, group and site.
#[derive(Debug, Clone)]
pub struct IndexNamer {
    prefix: String,
}

impl IndexNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The index `entity` is stored in for `site`.
    pub fn name_for(&self, entity: &Entity, site: &Site) -> String {
        self.name_for_group(entity.kind, entity.group().unwrap_or_default(), site)
    }

    /// The index for entities of `kind` in group `group_handle` and `site`.
    pub fn name_for_group(&self, kind: EntityKind, group_handle: &str, site: &Site) -> String {
        let mut parts: Vec<String> = vec![self.prefix.clone()];

        match kind {
            EntityKind::Document => {}
            EntityKind::Category => parts.push(CATEGORY_SEGMENT.to_string()),
            EntityKind::File => parts.push(FILE_SEGMENT.to_string()),
        }

        parts.push(to_snake_case(group_handle));
        parts.push(site.handle.to_lowercase());
        parts.push(site.language.to_lowercase());

        parts.join(SEPARATOR)
    }

    /// Every index name the allow-lists can produce across `sites`.
    pub fn all_names_for(&self, allow_lists: &AllowLists, sites: &[Site]) -> BTreeSet<String> {
        let mut names = BTreeSet::new();

        for site in sites {
            for kind in EntityKind::ALL {
                for handle in allow_lists.for_kind(kind) {
                    names.insert(self.name_for_group(kind, handle, site));
                }
            }
        }

        names
    }
}

/// Convert a handle such as `blogPosts` or `Blog-Posts` to `blog_posts`.
///
/// Words are split on non-alphanumeric characters and on case humps; an
/// acronym stays one word (`HTMLPages` becomes `html_pages`).
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join(SEPARATOR)
}
