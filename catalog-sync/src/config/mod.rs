//! Configuration module for the catalog synchronizer.

pub mod dependencies;
pub mod settings;

pub use dependencies::{Dependencies, DependencyOptions};
pub use settings::{HostEntry, SearchTemplateRow, Settings, SettingsViolation};
