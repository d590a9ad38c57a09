use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::types::DEFAULT_CAPABILITY;

const APP_DIR: &str = "voicewp-settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file holding stored options; defaults to the config directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Schema files loaded when none are given on the command line
    #[serde(default)]
    pub schema_paths: Vec<PathBuf>,

    /// Capabilities held by the CLI user when rendering pages
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
}

fn default_capabilities() -> Vec<String> {
    vec![DEFAULT_CAPABILITY.to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            schema_paths: Vec::new(),
            capabilities: default_capabilities(),
        }
    }
}

impl AppConfig {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_DIR)
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_DIR))
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        debug!(
            "Loaded config with {} schema files",
            config.schema_paths.len()
        );
        Ok(config)
    }

    /// Database file, falling back to `settings.db` in the config directory
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_config_dir()?.join("settings.db")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.capabilities, vec!["manage_options".to_string()]);
    }

    #[test]
    fn test_parse() {
        let config = AppConfig::parse(
            r#"
database_path = "/tmp/voicewp.db"
schema_paths = ["voicewp.toml"]
capabilities = ["manage_options", "edit_posts"]
"#,
        )
        .unwrap();

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/voicewp.db")));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/voicewp.db"));
        assert_eq!(config.schema_paths, vec![PathBuf::from("voicewp.toml")]);
        assert_eq!(config.capabilities.len(), 2);
    }

    #[test]
    fn test_singular_keys_rejected() {
        let result = AppConfig::parse(
            r#"
schema_path = "voicewp.toml"
capability = "manage_options"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
