//! Command handlers for the settings CLI

pub mod fields;
pub mod get;
pub mod render;
pub mod set;

pub use fields::fields_command;
pub use get::get_command;
pub use render::render_command;
pub use set::set_command;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use voicewp_settings::config::AppConfig;
use voicewp_settings::settings::schema;
use voicewp_settings::settings::{
    AdminHost, SettingsCatalog, SettingsDefinition, SettingsRegistry, SettingsType, SqliteStore,
};

/// Loaded schemas, store and config shared by every command
pub struct SettingsContext {
    pub config: AppConfig,
    pub catalog: SettingsCatalog,
    pub store: Arc<SqliteStore>,
}

impl SettingsContext {
    /// Load config, register every schema and open the store
    pub async fn load(
        config_path: Option<PathBuf>,
        schemas: Vec<PathBuf>,
        db: Option<PathBuf>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load_from(&path)?,
            None => AppConfig::load()?,
        };

        let schema_paths = if schemas.is_empty() {
            config.schema_paths.clone()
        } else {
            schemas
        };
        if schema_paths.is_empty() {
            anyhow::bail!("No settings schema given. Pass --schema <file> or set schema_paths in the config file.");
        }

        let catalog = SettingsCatalog::new();
        for path in &schema_paths {
            catalog.register(schema::load_definition(path)?)?;
        }
        log::debug!("Loaded {} settings definitions", catalog.count());

        let db_path = match db {
            Some(path) => path,
            None => config.database_path()?,
        };
        let store = Arc::new(SqliteStore::connect(&db_path).await?);

        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    /// Pick a definition by name, or the only one loaded
    pub fn select(&self, name: Option<&str>) -> Result<SettingsDefinition> {
        let ty = SettingsType::OptionsPage;
        match name {
            Some(name) => self
                .catalog
                .get(ty, name)
                .ok_or_else(|| anyhow::anyhow!("Settings '{}' not found", name)),
            None => {
                let names = self.catalog.names(ty);
                match names.as_slice() {
                    [only] => self
                        .catalog
                        .get(ty, only)
                        .ok_or_else(|| anyhow::anyhow!("Settings '{}' not found", only)),
                    _ => anyhow::bail!(
                        "Several settings are loaded ({}). Choose one with --name.",
                        names.join(", ")
                    ),
                }
            }
        }
    }

    /// Build a registry for `definition` against the store
    pub async fn registry(
        &self,
        definition: SettingsDefinition,
        host: Arc<dyn AdminHost>,
    ) -> Result<Arc<SettingsRegistry>> {
        SettingsRegistry::new(definition, self.store.clone(), host).await
    }
}
