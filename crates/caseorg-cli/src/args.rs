use crate::types::{LogLevel, OutputFormat};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "caseorg")]
#[command(about = "Browse case folders, notes and documents on a case-organizer server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory holding config.toml and the log file
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Server base URL (overrides server.base_url)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Enable administrator actions such as deleting files
    #[arg(long, global = true)]
    pub admin: bool,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive case browser (default)
    Browse,

    /// Search files across cases
    Search(SearchArgs),

    /// Find cases by name
    Cases { query: String },

    /// List one folder level
    Tree { path: Option<String> },

    /// Show a case note, or write it with --set
    Note {
        year: String,
        month: String,
        case: String,

        /// Replace (or create) the note with this content
        #[arg(long)]
        set: Option<String>,
    },

    /// Delete a file (administrators only)
    Delete {
        path: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Search the case-law library
    CaseLaw(CaseLawArgs),

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free text matched against file paths
    #[arg(long)]
    pub q: Option<String>,

    /// Fragment of the case name
    #[arg(long)]
    pub party: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub month: Option<String>,

    #[arg(long)]
    pub domain: Option<String>,

    #[arg(long)]
    pub subcategory: Option<String>,

    #[arg(long = "type")]
    pub file_type: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CaseLawArgs {
    /// Full-text query
    pub text: Option<String>,

    #[arg(long)]
    pub party: Option<String>,

    #[arg(long)]
    pub citation: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default config.toml if none exists
    Init,
}
