//! Command-line interface definition

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "eim-monitor",
    version,
    about = "Monitor ESP-IDF Installation Manager runs in a terminal"
)]
pub struct Cli {
    /// Directory containing the install registry (eim_idf.json)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Increase log verbosity (-v for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an installation and monitor it to completion
    Run {
        /// Installer executable to launch
        #[arg(long, default_value = "eim")]
        installer: PathBuf,

        /// IDF versions to install, comma separated
        #[arg(long, value_delimiter = ',')]
        versions: Vec<String>,

        /// Target installation directory
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Attach to an installation started externally; installer output is
    /// read from stdin (fix mode)
    Attach {
        /// Versions the external run is installing, comma separated
        #[arg(long, value_delimiter = ',')]
        versions: Vec<String>,
    },
}
