//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Map embed geometry pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file name (default: mapembed.toml)
    #[arg(short = 'C', long, default_value = "mapembed.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate and sanitize geometry without a page
    Sanitize {
        /// Geometry file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Process every embed of a page manifest and print the client payload
    Page {
        /// TOML file of `[[embed]]` tables
        manifest: PathBuf,

        /// Send all group data, as a live preview does
        #[arg(long)]
        preview: bool,

        /// Also print the persisted page state
        #[arg(long)]
        state: bool,
    },

    /// Print the private group id of a geometry document
    Hash {
        /// Geometry file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Select groups from stored group data
    Groups {
        /// JSON object of group id to items, `-` for stdin
        stored: PathBuf,

        /// Group ids to select; all when omitted
        ids: Vec<String>,

        /// Read `stored` as a persisted page state
        #[arg(long)]
        state: bool,
    },
}
