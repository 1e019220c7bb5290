use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trustlog")]
#[command(about = "Analyze trust, reputation and keystore activity in sensor-node logs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze every sensor-node log in a results directory
    Analyze {
        /// Directory holding <kind>.<hostname>.<variant>.pyterm.log files
        #[arg(long, default_value = "results")]
        log_dir: PathBuf,

        /// Configuration file (defaults to trustlog.toml in the log directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only analyze the log of this host
        #[arg(long)]
        host: Option<String>,
    },

    /// Print every event recognized in one log file, in order
    Inspect {
        file: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}
