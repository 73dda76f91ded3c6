//! Diagnostic logging setup.
//!
//! `RBERICHTSHEFT_LOG` takes precedence over the `log_level` config entry,
//! e.g. `RBERICHTSHEFT_LOG=rberichtsheft::db=debug`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "RBERICHTSHEFT_LOG";

/// Install the global subscriber. A second call is a no-op.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
