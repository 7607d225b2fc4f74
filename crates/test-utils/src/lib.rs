//! Shared helpers for depgraph's integration tests.

pub mod builders;
pub mod fake_job;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a whole fake-job run; real shell jobs get more.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// depgraph's own events are kept down to `debug` and everything else at
/// `warn`, unless `RUST_LOG` says otherwise. Output only shows up for
/// failing tests.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,depgraph=debug"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await `run`, panicking with `limit` in the message if it takes longer.
///
/// A stalled depth (a job that never reports) shows up here rather than as a
/// hung test.
pub async fn with_timeout<F, T>(limit: Duration, run: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, run).await {
        Ok(out) => out,
        Err(_) => panic!("run did not finish within {limit:?}"),
    }
}
