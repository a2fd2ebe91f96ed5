//! Backend connectivity probe.

use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::backend::BackendHealth;
use cosmetica_storefront::config::StorefrontConfig;
use tracing::warn;

use super::{client, write_line};

/// Probe the backend and report its state. An unreachable backend is
/// reported, not treated as a command failure.
pub async fn probe(config: &StorefrontConfig) -> Result<(), StorefrontError> {
    let client = client(config)?;
    let health = client.probe().await;

    match &health {
        BackendHealth::Up => write_line(format_args!("{} is up", client.base_url()))?,
        BackendHealth::Down(reason) => {
            warn!(reason = %reason, "Backend is down");
            write_line(format_args!("{} is down: {reason}", client.base_url()))?;
        }
        BackendHealth::TimedOut => {
            warn!(timeout = ?config.backend.probe_timeout, "Backend probe timed out");
            write_line(format_args!(
                "{} did not answer within {:?}",
                client.base_url(),
                config.backend.probe_timeout
            ))?;
        }
    }
    Ok(())
}
