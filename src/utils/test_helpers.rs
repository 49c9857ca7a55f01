use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOGGING_INIT: Once = Once::new();

/// Installs a test-writer subscriber for the integration tests.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `debug`, so a failing
/// test shows the controller transitions that led up to it. Safe to call from
/// every test, the subscriber is installed once per process.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("listing_search=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
