use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tvreel")]
#[command(author, version, about = "Remote-driven video browser with resume support")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the bundled videos and their saved positions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drive the list and player with remote commands
    Browse {
        /// Script of remote commands (reads stdin if omitted)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Keep resume positions in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// Inspect or edit saved resume positions
    Resume {
        #[command(subcommand)]
        action: ResumeAction,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses --config or defaults if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum ResumeAction {
    /// Show the saved position for a URI
    Show {
        uri: String,
    },

    /// Forget the saved position for a URI
    Clear {
        uri: String,
    },

    /// Print the store key derived from a URI
    Key {
        uri: String,
    },
}
