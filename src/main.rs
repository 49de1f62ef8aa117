//! # Startup Logger - Main Entry Point
//!
//! Initializes the process-wide file logger exactly as a service would at
//! startup, then emits one record through the global `tracing` facade.
//!
//! ## Error Handling
//!
//! The library reports initialization failures as errors. Logging is a hard
//! prerequisite here, so `main` treats any such error as fatal: it prints the
//! error chain to stderr and exits with a non-zero status.

use anyhow::{Context, Result};
use clap::Parser;
use startup_logger::{cli::Args, init_logger_with};
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.logger_config();

    let logger = init_logger_with(&config).context("logger initialization failed")?;

    info!("{}", args.message);

    logger.sync()?;
    println!("{}", logger.log_file().display());
    Ok(())
}
