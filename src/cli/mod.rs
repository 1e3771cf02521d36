//! CLI Module
//!
//! Command-line interface for reading, writing and inspecting archives.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manuscript archive tool
#[derive(Parser, Debug)]
#[command(name = "manuscript")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Archive endpoint (overrides MANUSCRIPT_ARCHIVE_URL)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// JSON file with storage settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch an archive and print it as JSON
    #[command(name = "read")]
    Read {
        /// Archive id (omit to read the endpoint itself)
        id: Option<String>,
    },

    /// Write an archive folder to the store
    #[command(name = "write")]
    Write {
        /// Folder with manuscript.json and resource files
        dir: PathBuf,

        /// Existing archive id to update (omit to create)
        #[arg(long)]
        id: Option<String>,
    },

    /// Print the figure held in a raw archive file
    #[command(name = "inspect")]
    Inspect {
        /// Raw archive JSON file
        file: PathBuf,
    },
}
