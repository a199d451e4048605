//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the Sentinel tracing/logging system.
///
/// Reads `SENTINEL_LOG` for per-subsystem log levels.
/// Format: `SENTINEL_LOG=sentinel_analysis::parsers=debug,sentinel_analysis::corpus=info`
///
/// Falls back to `sentinel=info` if `SENTINEL_LOG` is not set or is invalid.
/// Idempotent; a subscriber installed elsewhere first is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("sentinel=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
