//! Tracing setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to
//! `taskpad.log` in the data directory instead.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::anyhow;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "taskpad.log";

/// Where log lines go.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Filter directive from -v/-q counts, falling back to the configured level.
pub fn default_level(verbose: u8, quiet: u8, configured: &str) -> String {
    let level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        configured
    };
    level.to_string()
}

/// Install the global subscriber. RUST_LOG overrides `level` when set.
pub fn init_tracing(level: &str, target: LogTarget<'_>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true);

    let init_result = match target {
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init(),
        LogTarget::File(dir) => builder
            .with_writer(tracing_appender::rolling::never(dir, LOG_FILE))
            .with_ansi(false)
            .try_init(),
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}
