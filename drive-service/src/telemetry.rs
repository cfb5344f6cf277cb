//! Logging setup.
//!
//! The service logs through `tracing`; this installs a compact fmt subscriber
//! filtered by `RUST_LOG` (default `info`).
//!
//! ```bash
//! RUST_LOG=drive_service=debug,drive_tree=debug my-app
//! ```

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are no-ops.
///
/// # Returns
///
/// `true` if this call installed the subscriber
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
