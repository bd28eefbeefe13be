//! Integration tests for Bakehouse.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bakehouse-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store against real files, across restarts
//! - `checkout_http` - Checkout against a local stub of the order API
//!
//! The stub order API is an axum router bound to an ephemeral port, so no
//! external services are needed.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Token the stub accepts.
pub const VALID_TOKEN: &str = "test-token-123";

/// How the stub answers `POST /api/orders`.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Accept every order, answering with the created order document.
    Accept,
    /// Accept every order, answering with this status and JSON body.
    AcceptWith(StatusCode, Value),
    /// Reject with this status and JSON body.
    Reject(StatusCode, Value),
}

#[derive(Clone)]
struct StubState {
    behavior: StubBehavior,
    received: Arc<Mutex<Vec<Value>>>,
}

/// A running stub order API.
pub struct StubOrderApi {
    /// Base URL to point the client at.
    pub url: Url,
    received: Arc<Mutex<Vec<Value>>>,
}

impl StubOrderApi {
    /// Spawn the stub on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(behavior: StubBehavior) -> Self {
        Self::spawn_under("/", behavior).await
    }

    /// Spawn the stub with its routes mounted below `prefix` (e.g. `/backend`),
    /// as when the backend sits behind a path-routing proxy. The returned URL
    /// includes the prefix without a trailing slash.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn_under(prefix: &str, behavior: StubBehavior) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            behavior,
            received: Arc::clone(&received),
        };

        let api = Router::new()
            .route("/api/orders", post(place_order))
            .route("/api/orders/my-orders", get(my_orders))
            .with_state(state);
        let prefix = prefix.trim_end_matches('/');
        let app = if prefix.is_empty() {
            api
        } else {
            Router::new().nest(prefix, api)
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}{prefix}")).unwrap(),
            received,
        }
    }

    /// Order payloads received so far.
    ///
    /// # Panics
    ///
    /// Panics if the recording lock is poisoned.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

async fn place_order(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authorized, token failed" })),
        )
            .into_response();
    }

    if let Ok(mut received) = state.received.lock() {
        received.push(body.clone());
    }

    match state.behavior {
        StubBehavior::Accept => (
            StatusCode::CREATED,
            Json(json!({
                "_id": "6650aa01",
                "status": "pending",
                "totalAmount": body["totalAmount"],
                "createdAt": "2024-05-24T10:15:00.000Z",
                "items": body["items"],
            })),
        )
            .into_response(),
        StubBehavior::AcceptWith(status, body) | StubBehavior::Reject(status, body) => {
            (status, Json(body)).into_response()
        }
    }
}

async fn my_orders(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authorized, no token" })),
        )
            .into_response();
    }

    Json(json!([
        {
            "_id": "o2",
            "items": [{"cake": {"_id": "c1", "name": "Choc", "image": "x.jpg"}, "quantity": 1, "price": 85}],
            "totalAmount": 85,
            "status": "completed",
            "createdAt": "2024-05-20T08:00:00.000Z"
        },
        {
            "_id": "o1",
            "items": [],
            "totalAmount": 0,
            "status": "out_for_delivery"
        }
    ]))
    .into_response()
}
