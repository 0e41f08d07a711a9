//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize logging based on verbosity level. `RUST_LOG` always wins if set.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
