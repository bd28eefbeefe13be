//! The cart store.
//!
//! [`CartStore`] is the single owner of the cart's line items. Every mutation
//! keeps two invariants: at most one line per product, and every line has a
//! quantity of at least 1. After each mutation the full cart is written to the
//! durable store; write failures are logged and never reach the caller, since
//! the in-memory cart stays authoritative.

use bakehouse_core::CakeId;
use rust_decimal::Decimal;

use crate::item::CartLineItem;
use crate::persist;
use crate::product::ValidProduct;
use crate::storage::CartStorage;

/// Persisted shopping cart.
///
/// Built once by the application shell with [`CartStore::open`] and passed by
/// reference to whatever needs it. Readers get `&[CartLineItem]`; only the
/// store's own methods can change lines.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    lines: Vec<CartLineItem>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart backed by `storage`, loading any saved snapshot.
    ///
    /// Missing or corrupt data yields an empty cart.
    pub fn open(storage: S) -> Self {
        let lines = persist::load(&storage);
        Self { lines, storage }
    }

    /// Add one unit of `product`.
    ///
    /// An existing line keeps its original name, price and image snapshot;
    /// only its quantity grows.
    pub fn add_item(&mut self, product: &ValidProduct) {
        if let Some(line) = self.line_mut(product.id()) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(product_id = %product.id(), quantity = line.quantity, "Incremented cart line");
        } else {
            self.lines.push(CartLineItem::from_product(product));
            tracing::debug!(product_id = %product.id(), "Added cart line");
        }
        self.persist();
    }

    /// Remove the line for `product_id`. Does nothing if it is absent.
    pub fn remove_item(&mut self, product_id: &CakeId) {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        if self.lines.len() != before {
            tracing::debug!(%product_id, "Removed cart line");
        }
        self.persist();
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero or less removes the line. Unknown products are
    /// ignored. Quantities beyond `u32::MAX` are clamped.
    pub fn update_quantity(&mut self, product_id: &CakeId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
            tracing::debug!(%product_id, quantity, "Updated cart line quantity");
        }
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        tracing::debug!("Cleared cart");
        self.persist();
    }

    /// Replace the in-memory lines with whatever is in the durable store.
    ///
    /// Another process sharing the same storage may have written since this
    /// store was opened; this is the explicit way to pick that up.
    pub fn reload(&mut self) {
        self.lines = persist::load(&self.storage);
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &CakeId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` over all lines, saturating at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn line_mut(&mut self, product_id: &CakeId) -> Option<&mut CartLineItem> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }

    fn persist(&self) {
        if let Err(e) = persist::save(&self.storage, &self.lines) {
            tracing::warn!(error = %e, lines = self.lines.len(), "Failed to persist cart");
        }
    }
}
