//! Process-wide catalog of settings definitions

use super::types::{SettingsDefinition, SettingsType};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe catalog keeping definition names unique per settings type
pub struct SettingsCatalog {
    definitions: RwLock<HashMap<(SettingsType, String), SettingsDefinition>>,
}

impl SettingsCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a definition
    ///
    /// Returns an error if a definition of the same type and name exists
    pub fn register(&self, def: SettingsDefinition) -> Result<()> {
        let mut defs = self.definitions.write().unwrap_or_else(|e| e.into_inner());
        let key = (def.ty, def.name.clone());
        if defs.contains_key(&key) {
            anyhow::bail!("Settings '{}' ({}) are already registered", def.name, def.ty);
        }
        log::debug!("Registered settings: {} ({})", def.name, def.title);
        defs.insert(key, def);
        Ok(())
    }

    /// Get a definition by type and name
    pub fn get(&self, ty: SettingsType, name: &str) -> Option<SettingsDefinition> {
        self.definitions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(ty, name.to_string()))
            .cloned()
    }

    pub fn contains(&self, ty: SettingsType, name: &str) -> bool {
        self.get(ty, name).is_some()
    }

    /// Names registered for a type, sorted
    pub fn names(&self, ty: SettingsType) -> Vec<String> {
        let defs = self.definitions.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<_> = defs
            .keys()
            .filter(|(t, _)| *t == ty)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Get total number of registered definitions
    pub fn count(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Default for SettingsCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::builder::SettingsDefBuilder;

    fn def(name: &str) -> SettingsDefinition {
        SettingsDefBuilder::options_page(name)
            .title("Test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let catalog = SettingsCatalog::new();
        catalog.register(def("voicewp_settings")).unwrap();

        let retrieved = catalog
            .get(SettingsType::OptionsPage, "voicewp_settings")
            .unwrap();
        assert_eq!(retrieved.name, "voicewp_settings");
        assert!(catalog.contains(SettingsType::OptionsPage, "voicewp_settings"));
        assert!(!catalog.contains(SettingsType::OptionsPage, "other"));
    }

    #[test]
    fn test_duplicate_registration() {
        let catalog = SettingsCatalog::new();
        catalog.register(def("voicewp_settings")).unwrap();
        let result = catalog.register(def("voicewp_settings"));
        assert!(result.is_err());
        assert_eq!(catalog.count(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let catalog = SettingsCatalog::new();
        catalog.register(def("zeta")).unwrap();
        catalog.register(def("alpha")).unwrap();

        assert_eq!(
            catalog.names(SettingsType::OptionsPage),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
    }
}
