//! Fluent builder API for creating settings definitions

use super::types::{
    FieldSpec, FieldType, Fields, SettingsArgs, SettingsDefinition, SettingsType,
    validate_identifier,
};
use anyhow::Result;
use serde_json::Value;

/// Builder for creating settings definitions with a fluent API
pub struct SettingsDefBuilder {
    ty: SettingsType,
    name: String,
    title: Option<String>,
    fields: Vec<(String, FieldSpec)>,
    args: SettingsArgs,
}

impl SettingsDefBuilder {
    /// Create a new builder for a settings surface
    pub fn new(ty: SettingsType, name: &str) -> Self {
        Self {
            ty,
            name: name.to_string(),
            title: None,
            fields: Vec::new(),
            args: SettingsArgs::new(),
        }
    }

    /// Shorthand for an options page definition
    pub fn options_page(name: &str) -> Self {
        Self::new(SettingsType::OptionsPage, name)
    }

    /// Set the page title
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Add a text field
    pub fn text_field(self, key: &str, label: &str, description: Option<&str>) -> Self {
        let mut spec = FieldSpec::new(label).with_type(FieldType::Text);
        spec.description = description.map(str::to_string);
        self.field(key, spec)
    }

    /// Add a field with an explicit spec
    pub fn field(mut self, key: &str, spec: FieldSpec) -> Self {
        self.fields.push((key.to_string(), spec));
        self
    }

    /// Attach the options page under a parent menu page
    pub fn parent_page(self, parent: &str) -> Self {
        self.arg("parent_page", parent)
    }

    /// Require a capability other than the default to open the page
    pub fn capability(self, capability: &str) -> Self {
        self.arg("capability", capability)
    }

    /// Set a free-form argument
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Build the settings definition
    ///
    /// Returns an error if the title is missing or a name is not usable
    /// as a storage key
    pub fn build(self) -> Result<SettingsDefinition> {
        validate_identifier("settings name", &self.name)?;
        let title = self
            .title
            .ok_or_else(|| anyhow::anyhow!("title is required for settings '{}'", self.name))?;
        let fields = Fields::from_entries(self.fields)?;

        Ok(SettingsDefinition {
            ty: self.ty,
            name: self.name,
            title,
            fields,
            args: self.args,
        })
    }
}
