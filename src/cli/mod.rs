//! CLI module - argument parsing, logging setup and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};

use tracing_subscriber::EnvFilter;

use crate::core::Config;

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose`/`--quiet`, then the configured
/// filter.
pub fn init_logging(global: &GlobalOpts, config: &Config) {
    let fallback = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        config.log_filter()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
