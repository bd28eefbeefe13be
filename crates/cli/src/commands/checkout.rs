//! Checkout command.
//!
//! Checkout is two steps. Without `--paid` the command shows the UPI payment
//! link for the cart total and stops. Once the customer has paid, running it
//! again with `--paid` places the order. The cart is cleared only when the
//! order API accepts the order.

use bakehouse_cart::checkout::{self, CheckoutError};
use bakehouse_cart::view::format_price;
use bakehouse_cart::{DeliveryDetails, HttpOrderApi, OrderConfirmation};

use super::cart::emit;
use super::open_cart;
use crate::config::CliConfig;

/// What a checkout run did.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Payment details were shown; nothing was sent.
    AwaitingPayment,
    /// The order API accepted the order.
    Placed(OrderConfirmation),
}

/// Check out the persisted cart.
///
/// # Errors
///
/// Returns an error if the cart is empty, the delivery details are invalid,
/// or the order API rejects the order. The cart is left untouched in every
/// error case.
pub async fn run(
    config: &CliConfig,
    details: DeliveryDetails,
    paid: bool,
) -> Result<CheckoutOutcome, CheckoutError> {
    let mut cart = open_cart(config);
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    details.validate()?;

    let total = cart.total_price();
    emit(&format!("Total amount: {}", format_price(total)));
    emit(&format!("Pay via UPI: {}", config.upi.payment_uri(total)));
    emit(&format!("QR code: {}", config.upi.qr_code_url(total)));

    if !paid {
        tracing::debug!(%total, "Awaiting payment confirmation, order not sent");
        emit("After paying, run checkout again with --paid to confirm your order.");
        return Ok(CheckoutOutcome::AwaitingPayment);
    }

    let api = HttpOrderApi::new(config.api_url.clone(), config.api_token.clone())?;
    let confirmation = checkout::place_order(&mut cart, &api, details).await?;

    match &confirmation.id {
        Some(id) => emit(&format!(
            "Order confirmed! Order {id} is {}.",
            confirmation.status.label()
        )),
        None => emit("Order confirmed!"),
    }
    Ok(CheckoutOutcome::Placed(confirmation))
}
