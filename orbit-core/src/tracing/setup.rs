//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Orbit tracing/logging system.
///
/// Reads the `ORBIT_LOG` environment variable for per-subsystem log
/// levels, e.g. `ORBIT_LOG=orbit_scoring=debug,orbit_storage=warn`.
/// Falls back to `orbit=info` when unset or invalid.
///
/// Idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ORBIT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("orbit=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
