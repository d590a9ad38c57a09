//! Admin page and form system the registry plugs into
//!
//! [`AdminHost`] is the seam to the hosting platform. [`MemoryHost`] is a
//! self-contained implementation that keeps registrations in memory and
//! renders pages the way the platform lays them out.

use super::render::escape;
use anyhow::Result;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Host events deferred callbacks can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Menu entries are being built
    AdminMenu,
    /// Settings, sections and fields are being registered
    AdminInit,
}

/// Deferred hook work; returns `false` once its owner is gone
pub type HookCallback = Arc<dyn Fn() -> bool + Send + Sync>;

/// Produces markup on demand; `None` once its owner is gone
pub type RenderCallback = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// A page entry under an existing menu page
#[derive(Clone)]
pub struct SubmenuPage {
    pub parent_slug: String,
    pub page_title: String,
    pub menu_title: String,
    pub capability: String,
    pub menu_slug: String,
    pub render: RenderCallback,
}

/// A field row inside a settings section
#[derive(Clone)]
pub struct SettingsField {
    pub id: String,
    pub title: String,
    pub page: String,
    pub section: String,
    pub render: RenderCallback,
}

/// Registered settings section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSection {
    pub id: String,
    pub title: String,
    pub page: String,
}

/// Page registration and form rendering services of the host platform
pub trait AdminHost: Send + Sync {
    /// Defer `callback` until `hook` fires
    fn add_action(&self, hook: Hook, callback: HookCallback);

    fn add_submenu_page(&self, page: SubmenuPage);

    /// Allow `option_name` to be saved by forms submitting `group`
    ///
    /// Registering the same pair twice has no further effect.
    fn register_setting(&self, group: &str, option_name: &str);

    /// Registering the same section id on a page twice has no further effect.
    fn add_settings_section(&self, id: &str, title: &str, page: &str);

    /// A later field with the same page, section and id takes over the row
    /// for as long as its render callback stays alive.
    fn add_settings_field(&self, field: SettingsField);

    /// Hidden inputs a form posting `group` must carry
    fn settings_fields(&self, group: &str) -> String;

    /// Every section registered on `page` with its field rows
    fn do_settings_sections(&self, page: &str) -> String;

    fn submit_button(&self) -> String;
}

#[derive(Default)]
struct HostState {
    actions: Vec<(Hook, HookCallback)>,
    pages: Vec<SubmenuPage>,
    settings: Vec<(String, String)>,
    sections: Vec<SettingsSection>,
    fields: Vec<SettingsField>,
}

/// In-process host keeping every registration in memory
///
/// Pages and field rows registered twice under the same key are kept as
/// candidates; the most recent live one renders. Callbacks reporting their
/// owner gone are pruned when they are next invoked.
pub struct MemoryHost {
    state: Mutex<HostState>,
    capabilities: HashSet<String>,
    nonce: String,
}

impl MemoryHost {
    /// Host whose current user holds the default administrative capability
    pub fn new() -> Self {
        Self::with_capabilities([super::types::DEFAULT_CAPABILITY])
    }

    /// Host whose current user holds exactly `capabilities`
    pub fn with_capabilities<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Mutex::new(HostState::default()),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            nonce: format!("{:010x}", rand::random::<u64>() & 0xff_ffff_ffff),
        }
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run every callback attached to `hook`, in registration order
    pub fn do_action(&self, hook: Hook) {
        // Callbacks register pages and fields, so run them unlocked.
        let callbacks: Vec<HookCallback> = self
            .state()
            .actions
            .iter()
            .filter(|(h, _)| *h == hook)
            .map(|(_, cb)| cb.clone())
            .collect();

        log::debug!("Running {} callbacks for {:?}", callbacks.len(), hook);
        let dead: Vec<HookCallback> = callbacks.into_iter().filter(|cb| !cb()).collect();

        if !dead.is_empty() {
            log::debug!("Dropping {} stale callbacks for {:?}", dead.len(), hook);
            self.state()
                .actions
                .retain(|(_, cb)| !dead.iter().any(|d| Arc::ptr_eq(d, cb)));
        }
    }

    /// Render the newest live candidate, pruning the dead ones
    fn render_latest(&self, candidates: &[RenderCallback]) -> Option<String> {
        let mut dead = Vec::new();
        let mut html = None;
        for render in candidates.iter().rev() {
            match render() {
                Some(out) => {
                    html = Some(out);
                    break;
                }
                None => dead.push(render.clone()),
            }
        }

        if !dead.is_empty() {
            let mut state = self.state();
            let is_dead = |cb: &RenderCallback| dead.iter().any(|d| Arc::ptr_eq(d, cb));
            state.pages.retain(|p| !is_dead(&p.render));
            state.fields.retain(|f| !is_dead(&f.render));
        }
        html
    }

    /// Number of callbacks waiting on `hook`
    pub fn action_count(&self, hook: Hook) -> usize {
        self.state()
            .actions
            .iter()
            .filter(|(h, _)| *h == hook)
            .count()
    }

    pub fn current_user_can(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Slugs of every registered submenu page
    pub fn page_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = Vec::new();
        for page in self.state().pages.iter() {
            if !slugs.contains(&page.menu_slug) {
                slugs.push(page.menu_slug.clone());
            }
        }
        slugs
    }

    /// Most recent registration for `slug`
    pub fn page(&self, slug: &str) -> Option<SubmenuPage> {
        self.state()
            .pages
            .iter()
            .rev()
            .find(|p| p.menu_slug == slug)
            .cloned()
    }

    /// Render a submenu page body for the current user
    pub fn render_page(&self, slug: &str) -> Result<String> {
        let page = self
            .page(slug)
            .ok_or_else(|| anyhow::anyhow!("No page registered with slug '{}'", slug))?;

        if !self.current_user_can(&page.capability) {
            anyhow::bail!(
                "Sorry, you are not allowed to access '{}' (requires '{}')",
                slug,
                page.capability
            );
        }

        let candidates: Vec<RenderCallback> = self
            .state()
            .pages
            .iter()
            .filter(|p| p.menu_slug == slug)
            .map(|p| p.render.clone())
            .collect();

        self.render_latest(&candidates)
            .ok_or_else(|| anyhow::anyhow!("Page '{}' is no longer available", slug))
    }

    /// Registered (group, option) pairs
    pub fn registered_settings(&self) -> Vec<(String, String)> {
        self.state().settings.clone()
    }

    pub fn sections(&self) -> Vec<SettingsSection> {
        self.state().sections.clone()
    }

    /// Field ids registered on `page`, in first registration order
    pub fn field_ids(&self, page: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for field in self.state().fields.iter().filter(|f| f.page == page) {
            if !ids.contains(&field.id) {
                ids.push(field.id.clone());
            }
        }
        ids
    }

    /// Render one registered field row; `None` when no live field has `id`
    pub fn render_registered_field(&self, page: &str, id: &str) -> Option<String> {
        let candidates: Vec<RenderCallback> = self
            .state()
            .fields
            .iter()
            .filter(|f| f.page == page && f.id == id)
            .map(|f| f.render.clone())
            .collect();
        self.render_latest(&candidates)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminHost for MemoryHost {
    fn add_action(&self, hook: Hook, callback: HookCallback) {
        self.state().actions.push((hook, callback));
    }

    fn add_submenu_page(&self, page: SubmenuPage) {
        log::debug!(
            "Registered page: {} under {} ({})",
            page.menu_slug,
            page.parent_slug,
            page.capability
        );
        self.state().pages.push(page);
    }

    fn register_setting(&self, group: &str, option_name: &str) {
        let mut state = self.state();
        if state
            .settings
            .iter()
            .any(|(g, o)| g == group && o == option_name)
        {
            return;
        }
        state
            .settings
            .push((group.to_string(), option_name.to_string()));
    }

    fn add_settings_section(&self, id: &str, title: &str, page: &str) {
        let mut state = self.state();
        if state.sections.iter().any(|s| s.id == id && s.page == page) {
            return;
        }
        state.sections.push(SettingsSection {
            id: id.to_string(),
            title: title.to_string(),
            page: page.to_string(),
        });
    }

    fn add_settings_field(&self, field: SettingsField) {
        self.state().fields.push(field);
    }

    fn settings_fields(&self, group: &str) -> String {
        format!(
            concat!(
                r#"<input type="hidden" name="option_page" value="{}" />"#,
                r#"<input type="hidden" name="action" value="update" />"#,
                r#"<input type="hidden" id="_wpnonce" name="_wpnonce" value="{}" />"#,
            ),
            escape(group),
            escape(&self.nonce)
        )
    }

    fn do_settings_sections(&self, page: &str) -> String {
        // Rows keyed by id in first registration order, newest candidate last.
        type Row = (String, String, Vec<RenderCallback>);
        let layout: Vec<(SettingsSection, Vec<Row>)> = {
            let state = self.state();
            state
                .sections
                .iter()
                .filter(|s| s.page == page)
                .map(|section| {
                    let mut rows: Vec<Row> = Vec::new();
                    for f in state
                        .fields
                        .iter()
                        .filter(|f| f.page == page && f.section == section.id)
                    {
                        match rows.iter_mut().find(|(id, _, _)| *id == f.id) {
                            Some(row) => {
                                row.1 = f.title.clone();
                                row.2.push(f.render.clone());
                            }
                            None => rows.push((f.id.clone(), f.title.clone(), vec![f.render.clone()])),
                        }
                    }
                    (section.clone(), rows)
                })
                .collect()
        };

        let mut html = String::new();
        for (section, rows) in layout {
            if !section.title.is_empty() {
                html.push_str(&format!("<h2>{}</h2>\n", escape(&section.title)));
            }
            let rows: Vec<(String, String)> = rows
                .into_iter()
                .filter_map(|(_, title, candidates)| {
                    self.render_latest(&candidates).map(|body| (title, body))
                })
                .collect();
            if rows.is_empty() {
                continue;
            }
            html.push_str("<table class=\"form-table\" role=\"presentation\">\n");
            for (title, body) in rows {
                html.push_str(&format!(
                    "<tr><th scope=\"row\">{}</th><td>{}</td></tr>\n",
                    escape(&title),
                    body
                ));
            }
            html.push_str("</table>\n");
        }
        html
    }

    fn submit_button(&self) -> String {
        concat!(
            r#"<p class="submit">"#,
            r#"<input type="submit" name="submit" id="submit" class="button button-primary" value="Save Changes" />"#,
            "</p>"
        )
        .to_string()
    }
}
