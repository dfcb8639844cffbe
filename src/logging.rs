//! Diagnostic logging.
//!
//! `KCOMMIT_LOG` takes any `tracing` filter (e.g. `KCOMMIT_LOG=kcommit=trace`);
//! without it, `--verbose` enables debug output and the default is warnings only.
//! Logs go to stderr so they never mix with the printed commit message.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "KCOMMIT_LOG";

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| default_filter(verbose));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "warn" };
    EnvFilter::new(format!("kcommit={level}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true).to_string(), "kcommit=debug");
        assert_eq!(default_filter(false).to_string(), "kcommit=warn");
    }
}
