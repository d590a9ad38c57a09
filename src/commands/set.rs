use super::SettingsContext;
use anyhow::Result;
use log::info;
use serde_json::Value;

/// Save the value of a field, keeping the other stored fields
pub async fn set_command(
    ctx: &SettingsContext,
    field: String,
    value: String,
    name: Option<String>,
) -> Result<()> {
    let definition = ctx.select(name.as_deref())?;
    info!("Setting field {} of {}", field, definition.name);

    if !definition.fields.contains(&field) {
        anyhow::bail!("Unknown field '{}' in settings '{}'", field, definition.name);
    }

    ctx.store
        .update_field(&definition.name, &field, Value::String(value))
        .await?;
    println!("Saved {}[{}]", definition.name, field);

    Ok(())
}
