//! Checkout: delivery details, order payload assembly and order placement.
//!
//! Checkout reads the cart, builds an [`OrderPayload`] and hands it to an
//! [`OrderApi`]. The cart is cleared only after the API accepts the order; any
//! failure leaves it untouched so the customer can retry.
//!
//! The payload's `totalAmount` is the cart's own total at submission time. The
//! backend reprices the order itself, so this figure is advisory.

use bakehouse_core::{CakeId, Phone, PhoneError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::order_api::{OrderApi, OrderApiError, OrderConfirmation};
use crate::storage::CartStorage;
use crate::store::CartStore;

/// Problems with the delivery form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// One or more required fields are blank.
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The phone number is not ten digits.
    #[error("Please enter a valid 10-digit phone number ({0})")]
    InvalidPhone(#[from] PhoneError),
}

/// Errors from [`place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The delivery details did not validate.
    #[error(transparent)]
    InvalidDetails(#[from] DeliveryError),

    /// The order API rejected the order or could not be reached.
    #[error(transparent)]
    OrderFailed(#[from] OrderApiError),
}

/// Delivery details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    #[serde(default)]
    pub special_instructions: String,
}

impl DeliveryDetails {
    /// Check that required fields are filled and the phone number is valid.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::MissingFields`] listing every blank required
    /// field, or [`DeliveryError::InvalidPhone`].
    pub fn validate(&self) -> Result<(), DeliveryError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("pincode", &self.pincode),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(DeliveryError::MissingFields(missing));
        }

        Phone::parse(&self.phone)?;
        Ok(())
    }
}

/// One ordered line as sent to the order API.
///
/// Money goes over the wire as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemPayload {
    #[serde(rename = "cake")]
    pub product_ref: CakeId,
    pub quantity: u32,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub price_at_order_time: Decimal,
}

/// Order-submission request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<OrderItemPayload>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub delivery_details: DeliveryDetails,
}

impl OrderPayload {
    /// Snapshot the cart into a payload.
    #[must_use]
    pub fn from_cart<S: CartStorage>(store: &CartStore<S>, delivery_details: DeliveryDetails) -> Self {
        let items = store
            .lines()
            .iter()
            .map(|line| OrderItemPayload {
                product_ref: line.product_id.clone(),
                quantity: line.quantity,
                price_at_order_time: line.unit_price,
            })
            .collect();

        Self {
            items,
            total_amount: store.total_price(),
            delivery_details,
        }
    }
}

/// Place an order for everything in the cart.
///
/// Validation happens before anything is sent. The API is called once; on
/// success the cart is cleared, on failure it is left exactly as it was.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`], [`CheckoutError::InvalidDetails`],
/// or [`CheckoutError::OrderFailed`] carrying the API's message.
#[instrument(skip_all, fields(lines = store.lines().len()))]
pub async fn place_order<S, A>(
    store: &mut CartStore<S>,
    api: &A,
    details: DeliveryDetails,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: CartStorage,
    A: OrderApi,
{
    if store.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    details.validate()?;

    let payload = OrderPayload::from_cart(store, details);

    match api.place_order(&payload).await {
        Ok(confirmation) => {
            tracing::info!(
                order_id = ?confirmation.id,
                total = %payload.total_amount,
                "Order placed, clearing cart"
            );
            store.clear();
            Ok(confirmation)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Order placement failed, cart kept");
            Err(e.into())
        }
    }
}
