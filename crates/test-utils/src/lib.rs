pub mod builders;
pub mod recorder;

pub use builders::{Stub, StubTool};
pub use recorder::LineRecorder;

use std::sync::Once;
use tokio::sync::{Mutex, MutexGuard};
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

static SERIAL: Mutex<()> = Mutex::const_new(());

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=whitebox_runner=trace cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Serialise tests that write and then execute a stub script.
///
/// Exec'ing a freshly written file fails with ETXTBSY if another thread forks
/// while the write handle is still open, so stub creation and the spawns
/// that use it must not overlap within one test binary.
pub async fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().await
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}
