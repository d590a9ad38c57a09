use super::SettingsContext;
use anyhow::Result;
use colored::Colorize;
use log::info;

/// List the fields of a settings definition in schema order
pub async fn fields_command(ctx: &SettingsContext, name: Option<String>) -> Result<()> {
    let definition = ctx.select(name.as_deref())?;
    info!("Listing fields for: {}", definition.name);

    println!("{} ({})", definition.title.bold(), definition.name);
    if definition.fields.is_empty() {
        println!("  {}", "No fields".dimmed());
        return Ok(());
    }

    for (key, spec) in definition.fields.iter() {
        println!(
            "  {}  {} [{}]",
            key.cyan(),
            spec.label,
            spec.field_type().to_string().dimmed()
        );
        if let Some(description) = spec.description() {
            println!("      {}", description.dimmed());
        }
    }

    Ok(())
}
