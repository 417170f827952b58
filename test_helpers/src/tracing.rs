//! Route `tracing` output through the test harness.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber writing to the test output.
///
/// Honours `RUST_LOG`. Calling it more than once is harmless.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
