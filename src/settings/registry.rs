//! Settings registry: one settings surface wired into the admin host

use super::host::{AdminHost, Hook, SettingsField, SubmenuPage};
use super::render::{self, FieldContext, escape};
use super::store::PersistenceStore;
use super::types::{FieldSpec, Fields, SettingsDefinition, SettingsType, ValueMap};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::OnceCell;

/// A settings surface: schema, cached values, and host registration
///
/// Instances are request-scoped. The value cache is a snapshot taken at
/// construction and must not be shared across concurrent requests.
pub struct SettingsRegistry {
    definition: SettingsDefinition,
    store: Arc<dyn PersistenceStore>,
    host: Arc<dyn AdminHost>,
    values: OnceCell<ValueMap>,
    fields_added: AtomicBool,
    this: Weak<SettingsRegistry>,
}

impl SettingsRegistry {
    /// Create the registry, prime its value cache and hook it into the host
    ///
    /// Fails when the definition has an invalid name or field key, or when
    /// the store cannot be read.
    pub async fn new(
        definition: SettingsDefinition,
        store: Arc<dyn PersistenceStore>,
        host: Arc<dyn AdminHost>,
    ) -> Result<Arc<Self>> {
        definition.validate()?;

        let registry = Arc::new_cyclic(|this| Self {
            definition,
            store,
            host,
            values: OnceCell::new(),
            fields_added: AtomicBool::new(false),
            this: this.clone(),
        });

        registry
            .load_values()
            .await
            .with_context(|| format!("Failed to load settings '{}'", registry.definition.name))?;

        match registry.definition.ty {
            SettingsType::OptionsPage => {
                let this = registry.this.clone();
                registry.host.add_action(
                    Hook::AdminMenu,
                    Arc::new(move || match this.upgrade() {
                        Some(registry) => {
                            registry.add_page();
                            true
                        }
                        None => false,
                    }),
                );

                let this = registry.this.clone();
                registry.host.add_action(
                    Hook::AdminInit,
                    Arc::new(move || match this.upgrade() {
                        Some(registry) => {
                            registry.add_fields();
                            true
                        }
                        None => false,
                    }),
                );
            }
        }

        log::debug!(
            "Created {} settings '{}' with {} fields",
            registry.definition.ty,
            registry.definition.name,
            registry.definition.fields.len()
        );
        Ok(registry)
    }

    /// Load persisted values once; later calls return the cached map
    pub async fn load_values(&self) -> Result<&ValueMap> {
        self.values
            .get_or_try_init(|| async {
                let values = match self.definition.ty {
                    SettingsType::OptionsPage => self.store.read(&self.definition.name).await?,
                };
                log::debug!(
                    "Loaded {} stored values for '{}'",
                    values.len(),
                    self.definition.name
                );
                Ok::<_, anyhow::Error>(values)
            })
            .await
    }

    /// Whether the value cache has been populated
    pub fn is_loaded(&self) -> bool {
        self.values.initialized()
    }

    /// Register the options page under its parent menu page
    ///
    /// Does nothing without a `parent_page` argument.
    pub fn add_page(&self) {
        let Some(parent) = self.definition.args.parent_page() else {
            log::debug!(
                "Settings '{}' has no parent page, skipping page registration",
                self.definition.name
            );
            return;
        };

        let this = self.this.clone();
        self.host.add_submenu_page(SubmenuPage {
            parent_slug: parent.to_string(),
            page_title: self.definition.title.clone(),
            menu_title: self.definition.title.clone(),
            capability: self.definition.args.capability().to_string(),
            menu_slug: self.definition.name.clone(),
            render: Arc::new(move || this.upgrade().map(|registry| registry.render_page())),
        });
    }

    /// Body of the options page
    pub fn render_page(&self) -> String {
        format!(
            concat!(
                "<div class=\"wrap\">\n",
                "<h2>{}</h2>\n",
                "<form method=\"POST\" action=\"options.php\">\n",
                "{}\n{}{}\n",
                "</form>\n",
                "</div>\n",
            ),
            escape(&self.definition.title),
            self.host.settings_fields(&self.get_options_group_name()),
            self.host.do_settings_sections(&self.definition.name),
            self.host.submit_button()
        )
    }

    /// Register the stored option, its section and one row per field
    ///
    /// Runs at most once per instance; does nothing without fields.
    pub fn add_fields(&self) {
        if self.definition.fields.is_empty() {
            return;
        }
        if self.fields_added.swap(true, Ordering::SeqCst) {
            return;
        }

        let page = self.definition.name.as_str();
        let section = self.get_options_section_name();

        self.host
            .register_setting(&self.get_options_group_name(), page);
        self.host.add_settings_section(&section, "", page);

        for (key, spec) in self.definition.fields.iter() {
            let key = key.to_string();
            let this = self.this.clone();
            self.host.add_settings_field(SettingsField {
                id: key.clone(),
                title: spec.label.clone(),
                page: page.to_string(),
                section: section.clone(),
                render: Arc::new(move || this.upgrade().map(|registry| registry.render_field(&key))),
            });
        }

        log::debug!(
            "Registered {} fields for '{}'",
            self.definition.fields.len(),
            page
        );
    }

    /// Markup for one field; empty for unknown keys
    pub fn render_field(&self, field_key: &str) -> String {
        let Some(spec) = self.get_field(field_key) else {
            return String::new();
        };

        let ctx = FieldContext {
            input_name: self.definition.input_name(field_key),
            value: self.get_field_value(field_key),
            spec: &spec,
        };
        render::render(&spec.field_type(), &ctx)
    }

    pub fn get_fields(&self) -> &Fields {
        &self.definition.fields
    }

    /// Field spec with defaults applied, or `None` for unknown keys
    pub fn get_field(&self, field_key: &str) -> Option<FieldSpec> {
        self.definition
            .fields
            .get(field_key)
            .map(FieldSpec::with_defaults)
    }

    /// Cached value of a field; never reads the store
    pub fn get_field_value(&self, field_key: &str) -> Option<&Value> {
        self.values.get()?.get(field_key)
    }

    pub fn get_options_group_name(&self) -> String {
        self.definition.group_name()
    }

    pub fn get_options_section_name(&self) -> String {
        self.definition.section_name()
    }

    pub fn definition(&self) -> &SettingsDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn title(&self) -> &str {
        &self.definition.title
    }
}
