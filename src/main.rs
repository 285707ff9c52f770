//! Permission group command-line tool
//!
//! Reads a permission file and runs a single query or mutation against it.

use clap::Parser;
use permgroup::{
    cli::{Args, read_source, run},
    config::{LogFormat, LoggingConfig, load_config},
};
use std::path::Path;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, then let flags override it
    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config)?;

    init_logging(&config.logging);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        source = %config.source.path,
        "Starting permgroup"
    );

    let text = read_source(Path::new(&config.source.path))
        .inspect_err(|e| error!(error = %e, "Failed to read permission file"))?;

    let output = run(&args.command, &text, &config)
        .inspect_err(|e| error!(error = %e, "Command failed"))?;

    print!("{}", output);
    Ok(())
}
