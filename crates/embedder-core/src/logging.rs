//! Log setup for hosts and tests.
//!
//! The filter comes from `RUST_LOG` and falls back to `info`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn report(result: Result<(), Box<dyn std::error::Error + Send + Sync>>) {
    if let Err(err) = result {
        eprintln!("embedder: logging already initialised: {err}");
    }
}

/// Install a global fmt subscriber. Later calls do nothing.
pub fn init() {
    INIT_ONCE.call_once(|| {
        report(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .try_init(),
        );
    });
}

/// Like [`init`] but routes output through the test harness capture.
pub fn init_for_tests() {
    INIT_ONCE.call_once(|| {
        report(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_test_writer()
                .try_init(),
        );
    });
}
