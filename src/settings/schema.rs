//! TOML schema files describing a settings definition

use super::builder::SettingsDefBuilder;
use super::types::{FieldSpec, FieldType, SettingsDefinition, SettingsType};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(rename = "type", default)]
    ty: SettingsType,
    name: String,
    title: String,
    #[serde(default)]
    args: BTreeMap<String, Value>,
    #[serde(default)]
    fields: Vec<SchemaField>,
}

#[derive(Debug, Deserialize)]
struct SchemaField {
    key: String,
    label: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type", default)]
    ty: Option<FieldType>,
}

/// Parse a definition from TOML text
pub fn parse_definition(content: &str) -> Result<SettingsDefinition> {
    let schema: SchemaFile = toml::from_str(content).context("Failed to parse settings schema")?;

    let mut builder = SettingsDefBuilder::new(schema.ty, &schema.name).title(&schema.title);
    for (key, value) in schema.args {
        builder = builder.arg(&key, value);
    }
    for field in schema.fields {
        let spec = FieldSpec {
            ty: field.ty,
            label: field.label,
            description: field.description,
        };
        builder = builder.field(&field.key, spec);
    }

    builder.build()
}

/// Load a definition from a TOML file
pub fn load_definition(path: &Path) -> Result<SettingsDefinition> {
    log::debug!("Loading settings schema from: {:?}", path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {:?}", path))?;

    parse_definition(&content).with_context(|| format!("Invalid schema file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
type = "options"
name = "voicewp_settings"
title = "VoiceWP Settings"

[args]
parent_page = "options-general.php"

[[fields]]
key = "apiKey"
label = "API Key"
description = "Key issued for the skill"
type = "text"

[[fields]]
key = "voice"
label = "Voice"

[[fields]]
key = "mode"
label = "Mode"
type = "select"
"#;

    #[test]
    fn test_parse_definition() {
        let def = parse_definition(SCHEMA).unwrap();

        assert_eq!(def.ty, SettingsType::OptionsPage);
        assert_eq!(def.name, "voicewp_settings");
        assert_eq!(def.title, "VoiceWP Settings");
        assert_eq!(def.args.parent_page(), Some("options-general.php"));

        let keys: Vec<_> = def.fields.keys().collect();
        assert_eq!(keys, vec!["apiKey", "voice", "mode"]);

        let api_key = def.fields.get("apiKey").unwrap();
        assert_eq!(api_key.ty, Some(FieldType::Text));
        assert_eq!(api_key.description(), Some("Key issued for the skill"));

        assert_eq!(def.fields.get("voice").unwrap().ty, None);
        assert_eq!(
            def.fields.get("mode").unwrap().ty,
            Some(FieldType::Other("select".to_string()))
        );
    }

    #[test]
    fn test_type_defaults_to_options() {
        let def = parse_definition("name = \"s\"\ntitle = \"S\"\n").unwrap();
        assert_eq!(def.ty, SettingsType::OptionsPage);
        assert!(def.fields.is_empty());
    }

    #[test]
    fn test_unknown_settings_type() {
        let result = parse_definition("type = \"meta\"\nname = \"s\"\ntitle = \"S\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_field_keys() {
        let content = r#"
name = "s"
title = "S"

[[fields]]
key = "a"
label = "A"

[[fields]]
key = "a"
label = "Again"
"#;
        assert!(parse_definition(content).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = load_definition(Path::new("/nonexistent/voicewp.toml"));
        assert!(result.is_err());
    }
}
