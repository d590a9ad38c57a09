//! Settings system for admin options pages
//!
//! The settings system provides:
//! - Schema-driven definitions with ordered, typed fields
//! - A value cache primed once from a persistence store
//! - Field rendering by type with escaped output
//! - Registration with the host's page and form system

pub mod builder;
pub mod catalog;
pub mod host;
pub mod registry;
pub mod render;
pub mod schema;
pub mod store;
pub mod types;

pub use builder::SettingsDefBuilder;
pub use catalog::SettingsCatalog;
pub use host::{AdminHost, Hook, MemoryHost};
pub use registry::SettingsRegistry;
pub use store::{MemoryStore, PersistenceStore, SqliteStore};
pub use types::{FieldSpec, FieldType, Fields, SettingsArgs, SettingsDefinition, SettingsType, ValueMap};
