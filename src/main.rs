use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::SettingsContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("voicewp-settings.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting voicewp-settings");

    let ctx = SettingsContext::load(cli.config, cli.schemas, cli.db).await?;

    match cli.command {
        Commands::Fields { name } => {
            commands::fields_command(&ctx, name).await?;
        }
        Commands::Render { name, fields_only } => {
            commands::render_command(&ctx, name, fields_only).await?;
        }
        Commands::Get { field, name } => {
            commands::get_command(&ctx, field, name).await?;
        }
        Commands::Set { field, value, name } => {
            commands::set_command(&ctx, field, value, name).await?;
        }
    }

    Ok(())
}
