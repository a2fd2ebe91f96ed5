//! Command handlers. Each writes its results to stdout; diagnostics go
//! through `tracing` on stderr.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod orders;

use std::fmt::Display;
use std::io::Write;

use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::backend::ApiClient;
use cosmetica_storefront::config::StorefrontConfig;

/// Build the backend client from configuration.
pub fn client(config: &StorefrontConfig) -> Result<ApiClient, StorefrontError> {
    Ok(ApiClient::new(&config.backend)?)
}

/// Write one line of command output to stdout.
pub fn write_line(line: impl Display) -> Result<(), StorefrontError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    Ok(())
}
