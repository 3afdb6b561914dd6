//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber for the process.
///
/// `RUST_LOG` wins when set; otherwise `fallback` is used as the filter
/// directive (for example `"info,hearth_runtime=debug"`). Calling this more
/// than once leaves the first subscriber in place.
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // Another subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
