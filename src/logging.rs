//! Tracing setup for the binary.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a compact stdout subscriber.
///
/// Respects `RUST_LOG` (defaults to `info`). Calling it twice is harmless; the
/// second installation is ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
}
