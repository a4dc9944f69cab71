//! Shared logging setup for the parforge binary.
//!
//! Logs go to stderr so that generated parameter files and commands on
//! stdout stay clean for piping.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::Result;

/// Maps the CLI verbosity flags to a log level.
///
/// `quiet` wins over any verbosity: 0=INFO, 1=DEBUG, 2+=TRACE.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// `RUST_LOG`, when set, overrides the level derived from the flags.
/// With `json` set, each event is written as one JSON object per line.
///
/// # Example
/// ```rust,no_run
/// use parforge_core::logging::init_logging;
///
/// // Initialize at DEBUG level
/// init_logging(1, false, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool, json: bool) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level_for(verbose, quiet)).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let initialized = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    initialized.map_err(|e| {
        crate::error::ParforgeError::configuration(format!(
            "Failed to initialize logging: {}",
            e
        ))
    })
}
