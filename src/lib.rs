//! VoiceWP settings - schema-driven admin settings pages
//!
//! A settings definition declares a named group of typed fields. A
//! [`SettingsRegistry`] built from it primes its values from a
//! [`PersistenceStore`] once, hooks itself into an [`AdminHost`] and
//! renders each field by type.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use voicewp_settings::settings::*;
//!
//! let definition = SettingsDefBuilder::options_page("voicewp_settings")
//!     .title("VoiceWP Settings")
//!     .text_field("apiKey", "API Key", None)
//!     .parent_page("options-general.php")
//!     .build()?;
//!
//! let host = Arc::new(MemoryHost::new());
//! let registry = SettingsRegistry::new(definition, Arc::new(MemoryStore::new()), host.clone()).await?;
//! host.do_action(Hook::AdminMenu);
//! host.do_action(Hook::AdminInit);
//! println!("{}", host.render_page("voicewp_settings")?);
//! ```

pub mod config;
pub mod settings;

pub use settings::{
    AdminHost, MemoryHost, MemoryStore, PersistenceStore, SettingsDefBuilder, SettingsDefinition,
    SettingsRegistry, SqliteStore,
};
