//! Test logging initialization for integration test binaries.
//!
//! Same initializer as the crate's internal test bootstrap, implemented here
//! because integration tests cannot see test-only crate modules.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Runs once per test binary, before any test.
#[ctor::ctor]
fn init_integration_logging() {
    init();
}
