//! Cart line items.

use bakehouse_core::CakeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::ValidProduct;

/// One product-and-quantity pair in the cart.
///
/// Name, unit price and image are snapshots taken when the product was first
/// added; they are not refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: CakeId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_ref: String,
    /// Always at least 1; absence is represented by removing the line.
    pub quantity: u32,
}

impl CartLineItem {
    /// A fresh line for `product` with quantity 1.
    #[must_use]
    pub fn from_product(product: &ValidProduct) -> Self {
        Self {
            product_id: product.id().clone(),
            name: product.name().to_owned(),
            unit_price: product.price(),
            image_ref: product.image().to_owned(),
            quantity: 1,
        }
    }

    /// `unit_price * quantity`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// `unit_price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }
}
