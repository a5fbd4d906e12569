//! Log output for the CLI.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "MODRES_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber, writing to stderr.
///
/// `verbose` forces `debug`; otherwise `MODRES_LOG` is honored and falls
/// back to `warn`.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
