use super::args::{Cli, Commands};
use super::handlers;
use crate::logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    match cli.command {
        Commands::Analyze {
            log_dir,
            config,
            host,
        } => handlers::analyze::handle(&log_dir, config.as_deref(), host.as_deref(), cli.format),

        Commands::Inspect { file, config } => {
            handlers::inspect::handle(&file, config.as_deref(), cli.format)
        }
    }
}
