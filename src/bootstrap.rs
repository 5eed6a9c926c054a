//! Process-ambient setup: env layering and tracing.

use tracing_subscriber::EnvFilter;

/// Load `./.env` if present. Explicit env vars always win; dotenvy never
/// overwrites existing values.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Install the global tracing subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
