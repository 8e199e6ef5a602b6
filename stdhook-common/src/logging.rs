//! Logging setup.
//!
//! Diagnostics go through `tracing` to stderr; user-facing output is printed
//! separately by the CLI on stdout.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an explicit filter directive.
pub const LOG_ENV: &str = "STDHOOK_LOG";

/// Pick the filter directive: `STDHOOK_LOG` wins, then `-v`, then quiet
/// defaults.
pub fn filter_directive(env_value: Option<&str>, verbose: bool, quiet: bool) -> String {
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(explicit) => explicit.to_string(),
        None if verbose => "debug".to_string(),
        None if quiet => "error".to_string(),
        None => "warn".to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool, quiet: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose, quiet);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
