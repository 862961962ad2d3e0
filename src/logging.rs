//! Tracing setup for embedders

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to
/// `termbridge=info`.
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("termbridge=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
