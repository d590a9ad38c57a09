use super::SettingsContext;
use anyhow::Result;
use log::info;
use std::sync::Arc;
use voicewp_settings::settings::{AdminHost, Hook, MemoryHost};

/// Render the admin page of a settings definition
///
/// Definitions without a parent page have no page of their own; their
/// field table is printed instead.
pub async fn render_command(
    ctx: &SettingsContext,
    name: Option<String>,
    fields_only: bool,
) -> Result<()> {
    let definition = ctx.select(name.as_deref())?;
    info!("Rendering settings: {}", definition.name);

    let host = Arc::new(MemoryHost::with_capabilities(
        ctx.config.capabilities.iter().cloned(),
    ));
    let registry = ctx.registry(definition, host.clone()).await?;

    host.do_action(Hook::AdminMenu);
    host.do_action(Hook::AdminInit);

    let html = if fields_only || host.page(registry.name()).is_none() {
        host.do_settings_sections(registry.name())
    } else {
        host.render_page(registry.name())?
    };
    print!("{}", html);

    Ok(())
}
