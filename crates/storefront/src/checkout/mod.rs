//! Checkout flow: shipping details, bank-transfer payment, confirmation.
//!
//! Each step is its own type and transitions consume the step they leave,
//! so a finished checkout cannot be driven back into payment:
//!
//! ```text
//! DetailsStep --submit--> PaymentStep --submit--> Confirmation
//!      ^                      |
//!      +--------back----------+
//! ```
//!
//! A rejected transition hands the original step back inside [`Rejected`]
//! together with the error to show.

mod payment;
mod shipping;

pub use payment::{BankTransferDetails, PaymentSlip};
pub use shipping::{ShippingDetails, ShippingForm};

use cosmetica_core::{EmailError, OrderId, UserId};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::backend::{OrderBackend, OrderPayload};
use crate::cart::{CartManager, KeyValueStore};

/// Reasons a checkout step refuses to advance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Required shipping fields were blank.
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Phone is not ten digits.
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,

    /// Email did not parse.
    #[error("Please enter a valid email address")]
    InvalidEmail(#[from] EmailError),

    /// No slip, or an empty file, was provided.
    #[error("Please upload your payment slip")]
    MissingPaymentSlip,

    /// Nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The backend refused or failed to create the order.
    #[error("Failed to place your order: {0}")]
    OrderFailed(String),
}

impl CheckoutError {
    /// Whether the customer can fix this by correcting their input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::OrderFailed(_))
    }
}

/// A step that refused to advance, returned with the reason.
#[derive(Debug)]
pub struct Rejected<S> {
    pub step: S,
    pub error: CheckoutError,
}

impl<S> Rejected<S> {
    const fn new(step: S, error: CheckoutError) -> Self {
        Self { step, error }
    }
}

/// Name of a checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    Details,
    Payment,
    Confirmation,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Details => write!(f, "details"),
            Self::Payment => write!(f, "payment"),
            Self::Confirmation => write!(f, "confirmation"),
        }
    }
}

// =============================================================================
// Details
// =============================================================================

/// Collecting the shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsStep {
    draft: ShippingForm,
}

impl DetailsStep {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with previously entered values filled in.
    #[must_use]
    pub const fn with_draft(draft: ShippingForm) -> Self {
        Self { draft }
    }

    /// Values to pre-fill the form with.
    #[must_use]
    pub const fn draft(&self) -> &ShippingForm {
        &self.draft
    }

    /// Validate the form and move to payment.
    ///
    /// # Errors
    ///
    /// Returns the details step, keeping `form` as its draft, when validation
    /// fails.
    pub fn submit(self, form: ShippingForm) -> Result<PaymentStep, Rejected<Self>> {
        match form.validate() {
            Ok(shipping) => Ok(PaymentStep { shipping }),
            Err(error) => Err(Rejected::new(Self::with_draft(form), error)),
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Waiting for the payment slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStep {
    shipping: ShippingDetails,
}

impl PaymentStep {
    /// Shipping details validated in the previous step.
    #[must_use]
    pub const fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// Return to the details step with the shipping data as draft.
    #[must_use]
    pub fn back(self) -> DetailsStep {
        DetailsStep::with_draft(ShippingForm::from(&self.shipping))
    }

    /// Place the order.
    ///
    /// Submits the cart and slip through `backend`, then asks for a receipt.
    /// A receipt failure is logged and does not fail the checkout. The cart
    /// is cleared only after the order was created.
    ///
    /// # Errors
    ///
    /// Returns the payment step when the slip is missing or empty, the cart
    /// is empty, or the backend fails to create the order. Nothing is retried.
    #[instrument(
        skip_all,
        fields(checkout_id = %Uuid::new_v4(), user_id = %user_id)
    )]
    pub async fn submit<S, B>(
        self,
        slip: Option<PaymentSlip>,
        user_id: UserId,
        cart: &mut CartManager<S>,
        backend: &B,
    ) -> Result<Confirmation, Rejected<Self>>
    where
        S: KeyValueStore,
        B: OrderBackend,
    {
        let Some(slip) = slip.filter(|slip| !slip.is_empty()) else {
            return Err(Rejected::new(self, CheckoutError::MissingPaymentSlip));
        };
        if cart.state().is_empty() {
            return Err(Rejected::new(self, CheckoutError::EmptyCart));
        }

        let payload = OrderPayload::from_cart(user_id, cart.state(), &self.shipping);
        let order_id = match backend.create_order(&payload, &slip).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Order creation failed");
                return Err(Rejected::new(
                    self,
                    CheckoutError::OrderFailed(e.to_string()),
                ));
            }
        };

        let receipt_generated = match backend.generate_receipt(order_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Receipt generation failed");
                false
            }
        };

        cart.clear();
        info!(order_id = %order_id, total = %payload.total, "Order placed");

        Ok(Confirmation {
            order_id,
            receipt_generated,
        })
    }
}

// =============================================================================
// Confirmation
// =============================================================================

/// Where a customer can go after a finished checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextDestination {
    OrderHistory,
    ContinueShopping,
}

impl NextDestination {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::OrderHistory => "/orders",
            Self::ContinueShopping => "/products",
        }
    }
}

/// Terminal step. The cart has already been cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    order_id: OrderId,
    receipt_generated: bool,
}

impl Confirmation {
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Whether the backend produced a receipt for the order.
    #[must_use]
    pub const fn receipt_generated(&self) -> bool {
        self.receipt_generated
    }

    #[must_use]
    pub const fn destinations(&self) -> [NextDestination; 2] {
        [NextDestination::OrderHistory, NextDestination::ContinueShopping]
    }
}

// =============================================================================
// Flow holder
// =============================================================================

/// Whichever step a checkout is currently in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutFlow {
    Details(DetailsStep),
    Payment(PaymentStep),
    Confirmation(Confirmation),
}

impl CheckoutFlow {
    /// A fresh checkout at the details step.
    #[must_use]
    pub fn new() -> Self {
        Self::Details(DetailsStep::new())
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        match self {
            Self::Details(_) => CheckoutStep::Details,
            Self::Payment(_) => CheckoutStep::Payment,
            Self::Confirmation(_) => CheckoutStep::Confirmation,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Confirmation(_))
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DetailsStep> for CheckoutFlow {
    fn from(step: DetailsStep) -> Self {
        Self::Details(step)
    }
}

impl From<PaymentStep> for CheckoutFlow {
    fn from(step: PaymentStep) -> Self {
        Self::Payment(step)
    }
}

impl From<Confirmation> for CheckoutFlow {
    fn from(step: Confirmation) -> Self {
        Self::Confirmation(step)
    }
}

impl<S: Into<Self>> From<Rejected<S>> for CheckoutFlow {
    fn from(rejected: Rejected<S>) -> Self {
        rejected.step.into()
    }
}
