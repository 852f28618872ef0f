use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "NOTED_LOG";

/// Filter used when `NOTED_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "debug";

/// Build the log filter: `--verbose` wins, then `NOTED_LOG`, then the default.
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber, writing to stderr.
///
/// Stdout stays reserved for user-facing output.
pub fn init(verbose: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if let Err(err) = result {
        eprintln!("Failed to initialise logging: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(filter(true).to_string(), VERBOSE_FILTER);
    }
}
