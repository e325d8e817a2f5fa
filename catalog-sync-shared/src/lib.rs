//! # Catalog Sync Shared
//!
//! Value types shared by the document-store gateway, the synchronizer core
//! and the application crate. Nothing in here performs I/O.

mod allow_lists;
mod entity;
mod progress;
mod site;

pub use allow_lists::AllowLists;
pub use entity::{Entity, EntityKind, EntityStatus, EntityVersion};
pub use progress::SyncProgress;
pub use site::Site;
