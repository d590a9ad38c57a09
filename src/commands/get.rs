use super::SettingsContext;
use anyhow::Result;
use log::info;
use std::sync::Arc;
use voicewp_settings::settings::MemoryHost;
use voicewp_settings::settings::render::display_value;

/// Print the stored value of a field
///
/// Prints nothing when the field has no stored value.
pub async fn get_command(ctx: &SettingsContext, field: String, name: Option<String>) -> Result<()> {
    let definition = ctx.select(name.as_deref())?;
    info!("Getting field {} of {}", field, definition.name);

    if !definition.fields.contains(&field) {
        anyhow::bail!("Unknown field '{}' in settings '{}'", field, definition.name);
    }

    let registry = ctx.registry(definition, Arc::new(MemoryHost::new())).await?;
    if let Some(value) = registry.get_field_value(&field) {
        println!("{}", display_value(Some(value)));
    }

    Ok(())
}
