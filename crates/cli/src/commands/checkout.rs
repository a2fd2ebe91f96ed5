//! Non-interactive checkout: details, then payment, then confirmation.

use std::path::Path;

use cosmetica_core::{Price, UserId};
use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::checkout::{
    CheckoutFlow, DetailsStep, PaymentSlip, PaymentStep, Rejected, ShippingForm,
};
use cosmetica_storefront::config::StorefrontConfig;
use tracing::{info, warn};

use super::{cart, client, write_line};

/// Run the whole checkout for the persisted cart.
///
/// On rejection the step the checkout stopped in is reported together with
/// the reason.
pub async fn run(
    config: &StorefrontConfig,
    user_id: UserId,
    form: ShippingForm,
    slip_path: Option<&Path>,
) -> Result<(), StorefrontError> {
    cosmetica_storefront::error::set_sentry_user(&user_id);

    let mut cart = cart::open(config)?;
    let backend = client(config)?;
    let (payment, slip) = enter_payment(form, slip_path)?;

    write_line(format_args!(
        "Shipping to {}, {}",
        payment.shipping().full_name(),
        payment.shipping().city
    ))?;
    write_line(format_args!(
        "Amount due: {}",
        Price::new(cart.state().total(), config.currency).display()
    ))?;
    for line in config.bank.instructions() {
        write_line(line)?;
    }

    let confirmation = match payment.submit(slip, user_id, &mut cart, &backend).await {
        Ok(confirmation) => confirmation,
        Err(rejected) => return stopped(rejected),
    };

    info!(order_id = %confirmation.order_id(), "Checkout complete");
    write_line(format_args!("Order #{} placed", confirmation.order_id()))?;
    if !confirmation.receipt_generated() {
        write_line("Your receipt will be available once the order is processed")?;
    }
    for destination in confirmation.destinations() {
        write_line(format_args!("  next: {}", destination.path()))?;
    }
    Ok(())
}

/// Submit the details step, then read the slip for the payment step.
///
/// The slip file is only touched once the details are accepted, so a bad
/// form is reported ahead of a bad slip path.
fn enter_payment(
    form: ShippingForm,
    slip_path: Option<&Path>,
) -> Result<(PaymentStep, Option<PaymentSlip>), StorefrontError> {
    let payment = match DetailsStep::new().submit(form) {
        Ok(payment) => payment,
        Err(rejected) => return stopped(rejected),
    };
    let slip = slip_path.map(PaymentSlip::from_path).transpose()?;
    Ok((payment, slip))
}

fn stopped<S: Into<CheckoutFlow>, T>(rejected: Rejected<S>) -> Result<T, StorefrontError> {
    let Rejected { step, error } = rejected;
    let flow: CheckoutFlow = step.into();
    warn!(step = %flow.step(), error = %error, "Checkout stopped");
    write_line(format_args!("Checkout stopped at the {} step", flow.step()))?;
    Err(error.into())
}
