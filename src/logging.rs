//! Diagnostic logging setup for the binary

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "fsort=info";
const VERBOSE_LOG_FILTER: &str = "fsort=debug";

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Installs a stderr fmt subscriber honouring `RUST_LOG`.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
