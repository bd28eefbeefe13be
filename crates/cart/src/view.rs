//! Display-ready cart views.
//!
//! Views are read-only snapshots built fresh from a [`CartStore`] each time
//! they are needed. Prices are pre-formatted for display.

use bakehouse_core::Price;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::item::CartLineItem;
use crate::storage::CartStorage;
use crate::store::CartStore;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: format_price(Decimal::ZERO),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Format an amount in the store currency.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    Price::inr(amount).display()
}

/// Number shown on the cart badge in the navigation bar.
#[must_use]
pub fn badge_count<S: CartStorage>(store: &CartStore<S>) -> u64 {
    store.total_items()
}

impl<S: CartStorage> From<&CartStore<S>> for CartView {
    fn from(store: &CartStore<S>) -> Self {
        Self {
            items: store.lines().iter().map(CartItemView::from).collect(),
            subtotal: format_price(store.total_price()),
            item_count: store.total_items(),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            image: line.image_ref.clone(),
            quantity: line.quantity,
            price: format_price(line.unit_price),
            line_price: format_price(line.line_total()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bakehouse_core::CakeId;

    use super::*;
    use crate::product::ProductDescriptor;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_empty_view() {
        let view = CartView::from(&CartStore::open(MemoryStorage::new()));
        assert_eq!(view, CartView::empty());
        assert_eq!(view.subtotal, "₹0.00");
    }

    #[test]
    fn test_view_formats_lines() {
        let mut store = CartStore::open(MemoryStorage::new());
        let choc = ProductDescriptor::new("c1", "Choc", 85, "x.jpg")
            .validate()
            .unwrap();
        let lemon = ProductDescriptor::new("c2", "Lemon", "49.5", "l.jpg")
            .validate()
            .unwrap();
        store.add_item(&choc);
        store.add_item(&choc);
        store.add_item(&lemon);

        let view = CartView::from(&store);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "₹219.50");
        assert_eq!(view.items[0].price, "₹85.00");
        assert_eq!(view.items[0].line_price, "₹170.00");
        assert_eq!(view.items[1].price, "₹49.50");
        assert_eq!(badge_count(&store), 3);
    }

    #[test]
    fn test_view_is_a_snapshot() {
        let mut store = CartStore::open(MemoryStorage::new());
        let choc = ProductDescriptor::new("c1", "Choc", 85, "x.jpg")
            .validate()
            .unwrap();
        store.add_item(&choc);
        let before = CartView::from(&store);

        store.update_quantity(&CakeId::new("c1"), 4);

        assert_eq!(before.item_count, 1);
        assert_eq!(CartView::from(&store).item_count, 4);
    }
}
