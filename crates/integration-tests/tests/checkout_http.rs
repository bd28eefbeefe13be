//! Integration tests for checkout against a stub order API.
//!
//! These tests run the real reqwest client against an axum stub bound to
//! localhost, verifying the wire format and the clear-on-success /
//! keep-on-failure behavior of checkout.

use axum::http::StatusCode;
use bakehouse_cart::checkout::{self, CheckoutError};
use bakehouse_cart::{
    CartStore, DeliveryDetails, FileStorage, HttpOrderApi, OrderApiError, ProductDescriptor,
};
use bakehouse_core::{OrderId, OrderStatus};
use bakehouse_integration_tests::{StubBehavior, StubOrderApi, VALID_TOKEN};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;

fn details() -> DeliveryDetails {
    DeliveryDetails {
        name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        address: "12 Baker Street".to_string(),
        city: "Pune".to_string(),
        pincode: "411001".to_string(),
        special_instructions: "Write 'Happy Birthday'".to_string(),
    }
}

fn filled_cart(dir: &std::path::Path) -> CartStore<FileStorage> {
    let mut cart = CartStore::open(FileStorage::new(dir));
    for (id, price) in [("c1", 85), ("c1", 85), ("c2", 50)] {
        let product = ProductDescriptor::new(id, format!("Cake {id}"), price, format!("{id}.jpg"))
            .validate()
            .unwrap_or_else(|e| panic!("invalid test product: {e}"));
        cart.add_item(&product);
    }
    cart
}

fn client(stub: &StubOrderApi, token: Option<&str>) -> HttpOrderApi {
    HttpOrderApi::new(stub.url.clone(), token.map(SecretString::from))
        .unwrap_or_else(|e| panic!("client: {e}"))
}

// =============================================================================
// Successful Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_success_clears_persisted_cart() {
    let stub = StubOrderApi::spawn(StubBehavior::Accept).await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, Some(VALID_TOKEN));

    let confirmation = checkout::place_order(&mut cart, &api, details())
        .await
        .unwrap_or_else(|e| panic!("checkout failed: {e}"));

    assert_eq!(confirmation.id, Some(OrderId::new("6650aa01")));
    assert_eq!(confirmation.status, OrderStatus::Pending);
    assert_eq!(confirmation.total_amount, Decimal::new(220, 0));
    assert!(cart.is_empty());
    assert!(CartStore::open(FileStorage::new(dir.path())).is_empty());

    let received = stub.received();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "items": [
                {"cake": "c1", "quantity": 2, "price": 85.0},
                {"cake": "c2", "quantity": 1, "price": 50.0}
            ],
            "totalAmount": 220.0,
            "deliveryDetails": {
                "name": "Asha Rao",
                "phone": "9876543210",
                "address": "12 Baker Street",
                "city": "Pune",
                "pincode": "411001",
                "specialInstructions": "Write 'Happy Birthday'"
            }
        })
    );
}

#[tokio::test]
async fn test_any_success_status_clears_cart() {
    let stub = StubOrderApi::spawn(StubBehavior::AcceptWith(
        StatusCode::CREATED,
        json!({ "message": "Order placed", "order": { "_id": "o9" } }),
    ))
    .await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, Some(VALID_TOKEN));

    let confirmation = checkout::place_order(&mut cart, &api, details())
        .await
        .unwrap_or_else(|e| panic!("accepted order reported as failed: {e}"));

    assert_eq!(confirmation.id, Some(OrderId::new("o9")));
    assert!(cart.is_empty());
    assert!(CartStore::open(FileStorage::new(dir.path())).is_empty());
    assert_eq!(stub.received().len(), 1);
}

#[tokio::test]
async fn test_success_without_order_id_still_clears_cart() {
    let stub = StubOrderApi::spawn(StubBehavior::AcceptWith(StatusCode::OK, json!({ "ok": true }))).await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, Some(VALID_TOKEN));

    let confirmation = checkout::place_order(&mut cart, &api, details())
        .await
        .unwrap_or_else(|e| panic!("accepted order reported as failed: {e}"));

    assert!(confirmation.id.is_none());
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let stub = StubOrderApi::spawn_under("/backend", StubBehavior::Accept).await;
    assert_eq!(stub.url.path(), "/backend");
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, Some(VALID_TOKEN));

    checkout::place_order(&mut cart, &api, details())
        .await
        .unwrap_or_else(|e| panic!("checkout failed: {e}"));
    assert!(cart.is_empty());
    assert_eq!(stub.received().len(), 1);

    let orders = api
        .my_orders()
        .await
        .unwrap_or_else(|e| panic!("my_orders: {e}"));
    assert_eq!(orders.len(), 2);
}

// =============================================================================
// Failed Checkout
// =============================================================================

#[tokio::test]
async fn test_rejected_order_keeps_cart_and_message() {
    let stub = StubOrderApi::spawn(StubBehavior::Reject(
        StatusCode::BAD_REQUEST,
        json!({ "message": "Cake c2 is out of stock" }),
    ))
    .await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let before = cart.lines().to_vec();
    let api = client(&stub, Some(VALID_TOKEN));

    let err = checkout::place_order(&mut cart, &api, details())
        .await
        .err()
        .unwrap_or_else(|| panic!("order should fail"));

    assert_eq!(err.to_string(), "Cake c2 is out of stock");
    assert!(matches!(
        err,
        CheckoutError::OrderFailed(OrderApiError::Api { status: 400, .. })
    ));
    assert_eq!(cart.lines(), before.as_slice());
    assert_eq!(
        CartStore::open(FileStorage::new(dir.path())).lines(),
        before.as_slice()
    );
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() {
    let stub = StubOrderApi::spawn(StubBehavior::Reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({}),
    ))
    .await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, Some(VALID_TOKEN));

    let err = checkout::place_order(&mut cart, &api, details())
        .await
        .err()
        .unwrap_or_else(|| panic!("order should fail"));

    assert_eq!(err.to_string(), "Failed to place order");
    assert_eq!(cart.total_items(), 3);
}

#[tokio::test]
async fn test_bad_token_surfaces_server_message() {
    let stub = StubOrderApi::spawn(StubBehavior::Accept).await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, Some("expired"));

    let err = checkout::place_order(&mut cart, &api, details())
        .await
        .err()
        .unwrap_or_else(|| panic!("order should fail"));

    assert_eq!(err.to_string(), "Not authorized, token failed");
    assert!(stub.received().is_empty());
    assert_eq!(cart.total_items(), 3);
}

#[tokio::test]
async fn test_signed_out_sends_nothing() {
    let stub = StubOrderApi::spawn(StubBehavior::Accept).await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());
    let api = client(&stub, None);

    let err = checkout::place_order(&mut cart, &api, details())
        .await
        .err()
        .unwrap_or_else(|| panic!("order should fail"));

    assert_eq!(err.to_string(), "User not logged in");
    assert!(stub.received().is_empty());
    assert_eq!(cart.total_items(), 3);
}

#[tokio::test]
async fn test_retry_after_failure() {
    let failing = StubOrderApi::spawn(StubBehavior::Reject(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "message": "Kitchen closed" }),
    ))
    .await;
    let accepting = StubOrderApi::spawn(StubBehavior::Accept).await;
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let mut cart = filled_cart(dir.path());

    let first = checkout::place_order(&mut cart, &client(&failing, Some(VALID_TOKEN)), details()).await;
    assert!(first.is_err());

    let second =
        checkout::place_order(&mut cart, &client(&accepting, Some(VALID_TOKEN)), details()).await;
    assert!(second.is_ok());
    assert!(cart.is_empty());
    assert_eq!(accepting.received().len(), 1);
}

// =============================================================================
// Order History
// =============================================================================

#[tokio::test]
async fn test_my_orders() {
    let stub = StubOrderApi::spawn(StubBehavior::Accept).await;
    let api = client(&stub, Some(VALID_TOKEN));

    let orders = api
        .my_orders()
        .await
        .unwrap_or_else(|e| panic!("my_orders: {e}"));

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id.as_str(), "o2");
    assert_eq!(orders[0].status, OrderStatus::Completed);
    assert_eq!(orders[0].total_amount, Decimal::new(85, 0));
    // Unknown statuses render as pending
    assert_eq!(orders[1].status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_my_orders_unauthorized() {
    let stub = StubOrderApi::spawn(StubBehavior::Accept).await;
    let api = client(&stub, Some("wrong"));

    let err = api
        .my_orders()
        .await
        .err()
        .unwrap_or_else(|| panic!("should be unauthorized"));

    assert!(matches!(err, OrderApiError::Api { status: 401, .. }));
    assert_eq!(err.to_string(), "Not authorized, no token");
}
