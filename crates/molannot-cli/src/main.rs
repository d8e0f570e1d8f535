mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("🚀 molannot CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    configure_threads(cli.threads)?;

    let command_result = match cli.command {
        Commands::Annotate(args) => {
            info!("Dispatching to 'annotate' command.");
            commands::annotate::run(args)
        }
    };

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}

#[cfg(feature = "parallel")]
fn configure_threads(threads: Option<usize>) -> Result<()> {
    use crate::error::CliError;

    if let Some(num_threads) = threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn configure_threads(threads: Option<usize>) -> Result<()> {
    if threads.is_some() {
        tracing::warn!("Built without the 'parallel' feature; ignoring --threads.");
    }
    Ok(())
}
