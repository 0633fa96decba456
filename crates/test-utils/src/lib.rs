//! Shared fixtures for tagrun's integration tests.
//!
//! - [`MemorySink`] stands in for the console and records tagged lines.
//! - [`CallCounter`] hands out cleanup callbacks and counts their calls.
//! - [`init_tracing`] / [`with_timeout`] keep test runs observable and
//!   bounded when a subprocess hangs.

pub mod memory_sink;

pub use memory_sink::{CallCounter, MemorySink};

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a single subprocess run in tests.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Route tagrun's diagnostics into the test harness's captured output.
///
/// Filter comes from `RUST_LOG` (e.g. `RUST_LOG=tagrun::exec=debug`) and
/// defaults to `tagrun=info`, which shows every launch and exit. Output is
/// only printed for failing tests unless `--nocapture` is given.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tagrun=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it outlives [`RUN_TIMEOUT`].
///
/// A subprocess that never exits would otherwise hang the whole test binary.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(RUN_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("run did not finish within {RUN_TIMEOUT:?}"),
    }
}
