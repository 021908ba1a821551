//! Test logging setup
//!
//! Library code only emits `tracing` events. Tests that want to see them
//! call [`init_tracing`], which installs a `fmt` subscriber writing through
//! the test harness's captured output and filtered by `RUST_LOG`
//! (default: `warn`).

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the test subscriber; later calls do nothing
///
/// If another global subscriber is already installed it is left alone.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
        if installed.is_err() {
            tracing::debug!(target: "mockmongo::fixture", "Global subscriber already set");
        }
    });
}
