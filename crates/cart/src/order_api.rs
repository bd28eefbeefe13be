//! Order API client.
//!
//! Orders are placed against the bakery's REST backend:
//!
//! - `POST {base}/api/orders` - place an order (bearer auth)
//! - `GET {base}/api/orders/my-orders` - list the signed-in customer's orders
//!
//! Non-2xx responses carry a JSON body with a `message` field that is shown to
//! the customer verbatim. Any 2xx to an order submission means the order was
//! accepted, whatever its body looks like.

use std::future::Future;

use bakehouse_core::{CakeId, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::checkout::OrderPayload;

const PLACE_ORDER_FALLBACK: &str = "Failed to place order";
const MY_ORDERS_FALLBACK: &str = "Failed to fetch orders";

/// Errors from the order API.
#[derive(Debug, Error)]
pub enum OrderApiError {
    /// No auth token is available, so nothing was sent.
    #[error("User not logged in")]
    NotLoggedIn,

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response. Displays the server message as-is.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse a success response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured base URL cannot be used.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Acknowledgement returned when an order is accepted.
///
/// Every field is optional on the wire; a backend that answers with an empty
/// or unfamiliar 2xx body still yields a confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    #[serde(rename = "_id", default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Cake details embedded in a past order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedCake {
    #[serde(rename = "_id", default)]
    pub id: Option<CakeId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// One line of a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummaryItem {
    /// Missing when the cake has since been deleted from the catalog.
    #[serde(default)]
    pub cake: Option<OrderedCake>,
    pub quantity: u32,
    pub price: Decimal,
}

/// A past order as listed on the customer's "my orders" page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderSummaryItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Places orders on behalf of checkout.
pub trait OrderApi {
    /// Submit `payload` once.
    ///
    /// # Errors
    ///
    /// Returns an error if the order was not accepted.
    fn place_order(
        &self,
        payload: &OrderPayload,
    ) -> impl Future<Output = Result<OrderConfirmation, OrderApiError>> + Send;
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the order backend.
#[derive(Clone)]
pub struct HttpOrderApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for HttpOrderApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOrderApi")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpOrderApi {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: Url, token: Option<SecretString>) -> Result<Self, OrderApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL, keeping any path prefix it has.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, OrderApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OrderApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn bearer(&self) -> Result<String, OrderApiError> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
            .ok_or(OrderApiError::NotLoggedIn)
    }

    /// Fetch the signed-in customer's orders.
    ///
    /// # Errors
    ///
    /// Returns [`OrderApiError::NotLoggedIn`] without a token, or an error if
    /// the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<OrderSummary>, OrderApiError> {
        let auth = self.bearer()?;
        let url = self.endpoint(&["api", "orders", "my-orders"])?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response, MY_ORDERS_FALLBACK).await);
        }

        response
            .json()
            .await
            .map_err(|e| OrderApiError::Parse(e.to_string()))
    }
}

impl OrderApi for HttpOrderApi {
    #[instrument(skip(self, payload), fields(items = payload.items.len()))]
    async fn place_order(
        &self,
        payload: &OrderPayload,
    ) -> Result<OrderConfirmation, OrderApiError> {
        let auth = self.bearer()?;
        let url = self.endpoint(&["api", "orders"])?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response, PLACE_ORDER_FALLBACK).await);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, %status, "Order accepted but response body was unreadable");
                String::new()
            }
        };
        let confirmation = confirmation_from_body(&body);

        tracing::info!(order_id = ?confirmation.id, %status, "Order accepted");
        Ok(confirmation)
    }
}

/// Read a confirmation out of a 2xx body.
///
/// Accepts the created order document itself or one wrapped as
/// `{"order": {...}}`. Anything else becomes an empty confirmation.
fn confirmation_from_body(body: &str) -> OrderConfirmation {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Order confirmation body is not JSON");
            return OrderConfirmation::default();
        }
    };
    let order = value.get("order").filter(|o| o.is_object()).unwrap_or(&value);

    serde_json::from_value(order.clone()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unrecognized order confirmation body");
        OrderConfirmation::default()
    })
}

/// Build an [`OrderApiError::Api`] from an error response.
async fn api_error(status: StatusCode, response: reqwest::Response, fallback: &str) -> OrderApiError {
    let body = response.text().await.unwrap_or_default();
    OrderApiError::Api {
        status: status.as_u16(),
        message: error_message(&body, fallback),
    }
}

/// Extract the `message` field from an error body, or use `fallback`.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
