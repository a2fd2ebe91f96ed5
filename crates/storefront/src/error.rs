//! Unified error handling with Sentry integration.
//!
//! Provides `StorefrontError`, which hosts (the CLI) return from command
//! handlers. Infrastructure failures are captured to Sentry when reported;
//! validation failures are shown to the customer and only logged.

use thiserror::Error;

use crate::backend::BackendError;
use crate::cart::{CartError, StorageError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Cart refused the operation.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// Checkout step refused to advance.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Local file or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad input from the user outside cart and checkout.
    #[error("{0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// Whether this failure is caused by the environment rather than input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Storage(_) | Self::Backend(_) | Self::Io(_)
        )
    }

    /// Text safe to show a customer.
    ///
    /// Internal details of storage and backend failures are hidden.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "Could not save your data, please try again".to_string(),
            Self::Io(e) => format!("Could not access a local file: {e}"),
            Self::Backend(BackendError::NotFound(_)) => "Not found".to_string(),
            Self::Backend(BackendError::Api { message, .. }) => message.clone(),
            Self::Backend(_) => "The store is unreachable right now, please try again".to_string(),
            _ => self.to_string(),
        }
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected user input");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context from a user ID.
///
/// Call this once the acting customer is known so errors are associated with
/// them.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
