//! Core types for settings definitions

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Persisted values of one settings surface, keyed by field key
pub type ValueMap = HashMap<String, Value>;

/// Capability required to open an options page when none is configured
pub const DEFAULT_CAPABILITY: &str = "manage_options";

/// Kind of settings surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SettingsType {
    /// Submenu options page backed by a single stored option
    #[default]
    #[serde(rename = "options")]
    OptionsPage,
}

impl SettingsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsType::OptionsPage => "options",
        }
    }
}

impl fmt::Display for SettingsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form control a field renders as
///
/// Unknown type names are kept as `Other` and rendered as text inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => FieldType::Text,
            _ => FieldType::Other(value),
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        FieldType::from(value.to_string())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema entry for one field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Declared type; `None` means the default (`text`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<FieldType>,

    /// Label shown next to the control
    pub label: String,

    /// Help text rendered beneath the control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(label: &str) -> Self {
        Self {
            ty: None,
            label: label.to_string(),
            description: None,
        }
    }

    pub fn with_type(mut self, ty: impl Into<FieldType>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Effective type, falling back to `text`
    pub fn field_type(&self) -> FieldType {
        self.ty.clone().unwrap_or_default()
    }

    /// Copy of this spec with defaults filled in
    pub fn with_defaults(&self) -> Self {
        Self {
            ty: Some(self.field_type()),
            ..self.clone()
        }
    }

    /// Description, treating an empty string as absent
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Ordered field schema; iteration follows insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fields {
    entries: Vec<(String, FieldSpec)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered entries, rejecting invalid or duplicate keys
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, FieldSpec)>,
    {
        let mut seen = HashSet::new();
        let mut fields = Self::new();
        for (key, spec) in entries {
            validate_identifier("field key", &key)?;
            if !seen.insert(key.clone()) {
                anyhow::bail!("Field '{}' is declared more than once", key);
            }
            fields.entries.push((key, spec));
        }
        Ok(fields)
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.entries.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Free-form definition arguments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsArgs(BTreeMap<String, Value>);

impl SettingsArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-empty string argument
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Page the options page is attached under; `None` disables the page
    pub fn parent_page(&self) -> Option<&str> {
        self.get_str("parent_page")
    }

    /// Capability gating the options page
    pub fn capability(&self) -> &str {
        self.get_str("capability").unwrap_or(DEFAULT_CAPABILITY)
    }
}

/// Immutable description of one settings surface
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDefinition {
    pub ty: SettingsType,

    /// Storage key, page slug and form namespace (e.g., "voicewp_settings")
    pub name: String,

    /// Human-readable page title
    pub title: String,

    pub fields: Fields,

    pub args: SettingsArgs,
}

impl SettingsDefinition {
    /// Check the name and every field key are usable identifiers
    ///
    /// Definitions from the builder already pass; this guards ones built
    /// or edited by hand.
    pub fn validate(&self) -> Result<()> {
        validate_identifier("settings name", &self.name)?;
        for (key, _) in self.fields.iter() {
            validate_identifier("field key", key)?;
        }
        Ok(())
    }

    /// Group the stored option is registered under
    pub fn group_name(&self) -> String {
        format!("{}-group", self.name)
    }

    /// Section holding every field of this definition
    pub fn section_name(&self) -> String {
        format!("{}-section", self.name)
    }

    /// Form control name for a field, namespaced under the definition
    pub fn input_name(&self, field_key: &str) -> String {
        format!("{}[{}]", self.name, field_key)
    }
}

/// Check that a name is usable as a storage key and a markup token
pub fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        anyhow::bail!("{} must not be empty", kind);
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        anyhow::bail!(
            "{} '{}' contains invalid character {:?} (allowed: A-Z, a-z, 0-9, '_', '-')",
            kind,
            value,
            c
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_from_string() {
        assert_eq!(FieldType::from("text"), FieldType::Text);
        assert_eq!(
            FieldType::from("checkbox"),
            FieldType::Other("checkbox".to_string())
        );
        assert_eq!(FieldType::from("checkbox").as_str(), "checkbox");
    }

    #[test]
    fn test_field_spec_defaults_to_text() {
        let spec = FieldSpec::new("API Key");
        assert_eq!(spec.ty, None);
        assert_eq!(spec.field_type(), FieldType::Text);
        assert_eq!(spec.with_defaults().ty, Some(FieldType::Text));
    }

    #[test]
    fn test_empty_description_is_absent() {
        let spec = FieldSpec::new("A").with_description("");
        assert_eq!(spec.description(), None);
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields = Fields::from_entries(vec![
            ("zeta".to_string(), FieldSpec::new("Z")),
            ("alpha".to_string(), FieldSpec::new("A")),
            ("mid".to_string(), FieldSpec::new("M")),
        ])
        .unwrap();

        let keys: Vec<_> = fields.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(fields.get("alpha").unwrap().label, "A");
        assert!(fields.get("missing").is_none());
    }

    #[test]
    fn test_fields_reject_duplicates() {
        let result = Fields::from_entries(vec![
            ("a".to_string(), FieldSpec::new("A")),
            ("a".to_string(), FieldSpec::new("Again")),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("name", "voicewp_settings").is_ok());
        assert!(validate_identifier("name", "voice-wp-2").is_ok());
        assert!(validate_identifier("name", "").is_err());
        assert!(validate_identifier("name", "bad name").is_err());
        assert!(validate_identifier("name", "x\"><script>").is_err());
    }

    #[test]
    fn test_args_parent_page() {
        let mut args = SettingsArgs::new();
        assert_eq!(args.parent_page(), None);

        args.insert("parent_page", "");
        assert_eq!(args.parent_page(), None);

        args.insert("parent_page", "options-general.php");
        assert_eq!(args.parent_page(), Some("options-general.php"));
        assert_eq!(args.capability(), DEFAULT_CAPABILITY);
    }

    #[test]
    fn test_derived_names() {
        let def = SettingsDefinition {
            ty: SettingsType::OptionsPage,
            name: "voicewp_settings".to_string(),
            title: "VoiceWP".to_string(),
            fields: Fields::new(),
            args: SettingsArgs::new(),
        };
        assert_eq!(def.group_name(), "voicewp_settings-group");
        assert_eq!(def.section_name(), "voicewp_settings-section");
        assert_eq!(def.input_name("apiKey"), "voicewp_settings[apiKey]");
    }

    #[test]
    fn test_validate_definition() {
        let mut def = SettingsDefinition {
            ty: SettingsType::OptionsPage,
            name: "voicewp_settings".to_string(),
            title: "VoiceWP".to_string(),
            fields: Fields::from_entries(vec![("apiKey".to_string(), FieldSpec::new("API Key"))])
                .unwrap(),
            args: SettingsArgs::new(),
        };
        assert!(def.validate().is_ok());

        def.fields
            .entries
            .push(("a b".to_string(), FieldSpec::new("Spaced")));
        assert!(def.validate().is_err());

        def.fields = Fields::new();
        def.name = "bad name\"".to_string();
        assert!(def.validate().is_err());
    }
}
