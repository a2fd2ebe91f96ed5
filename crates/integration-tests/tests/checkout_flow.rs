//! Checkout driven end to end against the in-process backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cosmetica_core::{OrderId, ProductId, UserId};
use cosmetica_integration_tests::{RecordingBackend, complete_form, product, slip};
use cosmetica_storefront::cart::{CartManager, MemoryStore};
use cosmetica_storefront::checkout::{
    CheckoutError, CheckoutFlow, CheckoutStep, DetailsStep, PaymentSlip, ShippingForm,
};
use cosmetica_storefront::StorefrontError;
use rust_decimal::Decimal;

const USER: UserId = UserId::new(7);

fn filled_cart() -> CartManager<MemoryStore> {
    let mut cart = CartManager::load(MemoryStore::new());
    cart.add_item(product(1, "Cream", 20), 2).unwrap();
    cart.add_item(product(2, "Toner", 12), 1).unwrap();
    cart
}

#[tokio::test]
async fn test_happy_path_places_order_and_clears_cart() {
    let backend = RecordingBackend::new();
    let mut cart = filled_cart();

    let payment = DetailsStep::new().submit(complete_form()).unwrap();
    let confirmation = payment
        .submit(Some(slip()), USER, &mut cart, &backend)
        .await
        .unwrap();

    assert_eq!(confirmation.order_id(), OrderId::new(1001));
    assert!(confirmation.receipt_generated());
    assert!(cart.state().is_empty());
    assert_eq!(cart.state().total(), Decimal::ZERO);

    let orders = backend.orders();
    assert_eq!(orders.len(), 1);
    let (payload, slip_name) = &orders[0];
    assert_eq!(slip_name, "slip.jpg");
    assert_eq!(payload.user_id, USER);
    assert_eq!(payload.total, Decimal::from(52));
    assert_eq!(payload.items.len(), 2);
    assert_eq!(payload.shipping_details.city, "Kandy");
    assert_eq!(backend.receipts(), vec![OrderId::new(1001)]);

    let flow = CheckoutFlow::from(confirmation);
    assert!(flow.is_complete());
}

#[tokio::test]
async fn test_short_phone_stays_in_details() {
    let form = ShippingForm {
        phone: "12345".to_string(),
        ..complete_form()
    };

    let rejected = DetailsStep::new().submit(form.clone()).unwrap_err();
    assert_eq!(rejected.error, CheckoutError::InvalidPhone);
    assert!(rejected.error.to_string().contains("phone"));
    assert_eq!(rejected.step.draft(), &form);

    let flow = CheckoutFlow::from(rejected);
    assert_eq!(flow.step(), CheckoutStep::Details);
}

#[tokio::test]
async fn test_missing_slip_stays_in_payment_and_keeps_cart() {
    let backend = RecordingBackend::new();
    let mut cart = filled_cart();
    let payment = DetailsStep::new().submit(complete_form()).unwrap();

    let rejected = payment
        .submit(None, USER, &mut cart, &backend)
        .await
        .unwrap_err();
    assert_eq!(rejected.error, CheckoutError::MissingPaymentSlip);
    assert!(rejected.error.to_string().contains("upload your payment slip"));
    assert_eq!(cart.state().items().len(), 2);
    assert!(backend.orders().is_empty());

    // An empty file counts as no slip.
    let rejected = rejected
        .step
        .submit(Some(PaymentSlip::new("slip.jpg", Vec::new())), USER, &mut cart, &backend)
        .await
        .unwrap_err();
    assert_eq!(rejected.error, CheckoutError::MissingPaymentSlip);

    // Retrying from the same step with a slip succeeds.
    let confirmation = rejected
        .step
        .submit(Some(slip()), USER, &mut cart, &backend)
        .await
        .unwrap();
    assert!(cart.state().is_empty());
    assert_eq!(backend.orders().len(), 1);
    assert_eq!(confirmation.order_id(), OrderId::new(1001));
}

#[tokio::test]
async fn test_backend_failure_keeps_cart_and_step() {
    let backend = RecordingBackend::failing_orders();
    let mut cart = filled_cart();
    let payment = DetailsStep::new().submit(complete_form()).unwrap();

    let rejected = payment
        .submit(Some(slip()), USER, &mut cart, &backend)
        .await
        .unwrap_err();

    assert!(matches!(
        rejected.error,
        CheckoutError::OrderFailed(ref message) if message.contains("Order service unavailable")
    ));
    assert_eq!(cart.state().total(), Decimal::from(52));
    assert_eq!(CheckoutFlow::from(rejected).step(), CheckoutStep::Payment);
}

#[tokio::test]
async fn test_receipt_failure_still_confirms() {
    let backend = RecordingBackend::failing_receipts();
    let mut cart = filled_cart();
    let payment = DetailsStep::new().submit(complete_form()).unwrap();

    let confirmation = payment
        .submit(Some(slip()), USER, &mut cart, &backend)
        .await
        .unwrap();

    assert!(!confirmation.receipt_generated());
    assert!(cart.state().is_empty());
    assert!(backend.receipts().is_empty());
}

#[tokio::test]
async fn test_empty_cart_is_rejected_at_payment() {
    let backend = RecordingBackend::new();
    let mut cart = CartManager::load(MemoryStore::new());
    let payment = DetailsStep::new().submit(complete_form()).unwrap();

    let rejected = payment
        .submit(Some(slip()), USER, &mut cart, &backend)
        .await
        .unwrap_err();
    assert_eq!(rejected.error, CheckoutError::EmptyCart);
    assert!(backend.orders().is_empty());
}

#[tokio::test]
async fn test_back_restores_validated_details() {
    let payment = DetailsStep::new().submit(complete_form()).unwrap();
    let details = payment.back();
    assert_eq!(details.draft(), &complete_form());

    // Resubmitting the draft moves forward again.
    let payment = details.clone().submit(details.draft().clone()).unwrap();
    assert_eq!(payment.shipping().full_name(), "Nadia Perera");
}

#[tokio::test]
async fn test_checkout_errors_surface_as_user_messages() {
    let rejected = DetailsStep::new().submit(ShippingForm::default()).unwrap_err();
    let err = StorefrontError::from(rejected.error);
    assert!(!err.is_internal());
    assert!(
        err.user_message()
            .starts_with("Please fill in all required fields: First Name")
    );
}

#[tokio::test]
async fn test_quantity_changes_before_checkout_reach_the_order() {
    let backend = RecordingBackend::new();
    let mut cart = filled_cart();
    cart.update_quantity(ProductId::new(1), 0);
    cart.remove_item(ProductId::new(2));

    let payment = DetailsStep::new().submit(complete_form()).unwrap();
    payment
        .submit(Some(slip()), USER, &mut cart, &backend)
        .await
        .unwrap();

    let orders = backend.orders();
    let (payload, _) = &orders[0];
    assert_eq!(payload.items.len(), 1);
    assert_eq!(payload.items[0].quantity, 1);
    assert_eq!(payload.total, Decimal::from(20));
}
