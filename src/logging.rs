//! Logging setup.
//!
//! The library only emits `tracing` events under the `u_planboard` target;
//! applications embedding the planner pick the subscriber. These helpers
//! cover the common case.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: planner events at `info`, other
/// crates at `warn`.
pub const DEFAULT_FILTER: &str = "warn,u_planboard=info";

/// Filter for test runs.
const TEST_FILTER: &str = "warn,u_planboard=debug";

/// `RUST_LOG` if set and valid, `fallback` otherwise.
fn env_filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs a global fmt subscriber.
///
/// Honors `RUST_LOG` (e.g. `RUST_LOG=u_planboard=debug`), defaulting to
/// [`DEFAULT_FILTER`]. Does nothing if the host already installed one.
///
/// ```no_run
/// u_planboard::logging::init();
/// ```
pub fn init() {
    let _ = fmt()
        .with_env_filter(env_filter_or(DEFAULT_FILTER))
        .with_line_number(true)
        .try_init();
}

/// Installs a subscriber writing planner debug events to the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(env_filter_or(TEST_FILTER))
        .with_test_writer()
        .try_init();
}
