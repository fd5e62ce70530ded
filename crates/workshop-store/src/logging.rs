//! Subscriber bootstrap for binaries and tests embedding the store.
//!
//! The library itself only emits `tracing` events; nothing is printed until a
//! host installs a subscriber, either its own or the one built here.

use crate::error::{Result, StoreError};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to `default_directive`.
///
/// Returns `Ok(true)` when this call installed the subscriber and `Ok(false)`
/// when a global subscriber was already set.
pub fn init_logging(default_directive: &str) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| StoreError::Config(format!("invalid log filter: {}", e)))?,
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}
