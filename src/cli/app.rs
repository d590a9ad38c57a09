use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "voicewp-settings")]
#[command(about = "Render and manage schema-driven admin settings pages")]
pub struct Cli {
    /// Settings schema file (repeatable); defaults to the configured schemas
    #[arg(short, long = "schema", global = true)]
    pub schemas: Vec<PathBuf>,

    /// SQLite database holding stored options
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the fields of a settings definition
    Fields {
        /// Settings name (required when several schemas are loaded)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Render the admin page of a settings definition
    Render {
        /// Settings name (required when several schemas are loaded)
        #[arg(short, long)]
        name: Option<String>,
        /// Print only the field table, without the page and form wrapper
        #[arg(long)]
        fields_only: bool,
    },
    /// Print the stored value of a field
    Get {
        /// Field key
        field: String,
        /// Settings name (required when several schemas are loaded)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Save the value of a field
    Set {
        /// Field key
        field: String,
        /// New value
        value: String,
        /// Settings name (required when several schemas are loaded)
        #[arg(short, long)]
        name: Option<String>,
    },
}
