//! Persisted cart snapshot format.
//!
//! The cart is stored as a full snapshot under a single key, rewritten after
//! every mutation:
//!
//! ```json
//! {"version": 1, "lines": [{"productId": "c1", "name": "Choc", "unitPrice": "85", "imageRef": "x.jpg", "quantity": 2}]}
//! ```
//!
//! Version 0 is the bare array written by the original web client
//! (`[{"_id", "name", "price", "image", "quantity"}]`); it is migrated on load.
//!
//! Loading never fails: absent or unusable data yields an empty cart.

use bakehouse_core::CakeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::item::CartLineItem;
use crate::product::{self, PriceInput, ProductError};
use crate::storage::{CartStorage, StorageError};

/// Storage key holding the cart snapshot.
pub const CART_KEY: &str = "cart";

/// Envelope version written by [`encode`].
pub const CURRENT_VERSION: u32 = 1;

/// Errors while decoding or writing a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("malformed cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported cart snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid cart line: {0}")]
    InvalidLine(String),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    lines: &'a [CartLineItem],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    lines: Value,
}

/// Line shape written by the original web client.
#[derive(Deserialize)]
struct LegacyLine {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(default)]
    name: String,
    price: PriceInput,
    #[serde(default)]
    image: String,
    quantity: i64,
}

impl LegacyLine {
    /// Convert, returning `None` for lines that carried no quantity.
    fn migrate(self) -> Result<Option<CartLineItem>, PersistError> {
        if self.id.trim().is_empty() {
            return Err(PersistError::InvalidLine(ProductError::MissingId.to_string()));
        }
        if self.quantity <= 0 {
            return Ok(None);
        }
        let unit_price = self
            .price
            .to_decimal()
            .map_err(|e| PersistError::InvalidLine(e.to_string()))?;
        let quantity = u32::try_from(self.quantity).unwrap_or(u32::MAX);

        Ok(Some(CartLineItem {
            product_id: CakeId::new(self.id),
            name: self.name,
            unit_price,
            image_ref: self.image,
            quantity,
        }))
    }
}

/// Serialize lines into the current envelope.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(lines: &[CartLineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: CURRENT_VERSION,
        lines,
    })
}

/// Parse a stored snapshot (current or legacy) into normalized lines.
///
/// # Errors
///
/// Returns an error for malformed JSON, an unknown envelope version, or a
/// line that cannot satisfy the cart's invariants.
pub fn decode(raw: &str) -> Result<Vec<CartLineItem>, PersistError> {
    let value: Value = serde_json::from_str(raw)?;

    let lines = if value.is_array() {
        let legacy: Vec<LegacyLine> = serde_json::from_value(value)?;
        let mut lines = Vec::with_capacity(legacy.len());
        for line in legacy {
            if let Some(line) = line.migrate()? {
                lines.push(line);
            }
        }
        lines
    } else {
        let envelope: Envelope = serde_json::from_value(value)?;
        if envelope.version != CURRENT_VERSION {
            return Err(PersistError::UnsupportedVersion(envelope.version));
        }
        let lines: Vec<CartLineItem> = serde_json::from_value(envelope.lines)?;
        for line in &lines {
            if line.product_id.is_blank() {
                return Err(PersistError::InvalidLine(ProductError::MissingId.to_string()));
            }
            product::check_unit_price(line.unit_price)
                .map_err(|e| PersistError::InvalidLine(e.to_string()))?;
        }
        lines
    };

    let lines = normalize(lines);
    if let Some(line) = lines.iter().find(|l| l.checked_line_total().is_none()) {
        return Err(PersistError::InvalidLine(format!(
            "line total for {} overflows",
            line.product_id
        )));
    }
    Ok(lines)
}

/// Drop zero-quantity lines and merge duplicate product IDs.
///
/// The first occurrence keeps its snapshot and position; later duplicates
/// only contribute their quantity.
fn normalize(lines: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut out: Vec<CartLineItem> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity == 0 {
            continue;
        }
        if let Some(existing) = out.iter_mut().find(|l| l.product_id == line.product_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            out.push(line);
        }
    }
    out
}

/// Load the cart from storage, degrading to empty on any problem.
pub fn load<S: CartStorage + ?Sized>(storage: &S) -> Vec<CartLineItem> {
    let raw = match storage.read(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No stored cart, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    match decode(&raw) {
        Ok(lines) => {
            tracing::debug!(lines = lines.len(), "Loaded stored cart");
            lines
        }
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable stored cart");
            Vec::new()
        }
    }
}

/// Write a full snapshot of `lines` to storage.
///
/// # Errors
///
/// Returns an error if encoding or the storage write fails.
pub fn save<S: CartStorage + ?Sized>(
    storage: &S,
    lines: &[CartLineItem],
) -> Result<(), PersistError> {
    let raw = encode(lines)?;
    storage.write(CART_KEY, &raw)?;
    Ok(())
}
