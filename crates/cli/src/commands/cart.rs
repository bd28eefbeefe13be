//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! bakehouse cart add --id c1 --name "Choc" --price 85 --image x.jpg
//! bakehouse cart update c1 3
//! bakehouse cart remove c1
//! bakehouse cart show --json
//! bakehouse cart clear
//! ```

use std::fmt::Write as _;

use bakehouse_cart::{CartView, ProductDescriptor, ProductError};
use bakehouse_core::CakeId;
use thiserror::Error;

use super::open_cart;
use crate::config::CliConfig;

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Product JSON could not be parsed.
    #[error("Invalid product JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Product failed validation.
    #[error("Invalid product: {0}")]
    Product(#[from] ProductError),
}

/// Print the cart.
pub fn show(config: &CliConfig, json: bool) -> Result<(), CartCommandError> {
    let view = CartView::from(&open_cart(config));
    let output = if json {
        serde_json::to_string_pretty(&view)?
    } else {
        render(&view)
    };
    emit(&output);
    Ok(())
}

/// Add one unit of a cake described by flags.
pub fn add(
    config: &CliConfig,
    id: &str,
    name: &str,
    price: &str,
    image: &str,
) -> Result<(), CartCommandError> {
    let product = ProductDescriptor::new(id, name, price, image).validate()?;
    let mut cart = open_cart(config);
    cart.add_item(&product);
    tracing::info!(product_id = %product.id(), items = cart.total_items(), "Added to cart");
    emit(&render(&CartView::from(&cart)));
    Ok(())
}

/// Add one unit of a cake given as catalog JSON.
pub fn add_json(config: &CliConfig, product: &str) -> Result<(), CartCommandError> {
    let descriptor: ProductDescriptor = serde_json::from_str(product)?;
    let product = descriptor.validate()?;
    let mut cart = open_cart(config);
    cart.add_item(&product);
    tracing::info!(product_id = %product.id(), items = cart.total_items(), "Added to cart");
    emit(&render(&CartView::from(&cart)));
    Ok(())
}

/// Remove a cake.
pub fn remove(config: &CliConfig, id: &str) {
    let mut cart = open_cart(config);
    cart.remove_item(&CakeId::new(id));
    emit(&render(&CartView::from(&cart)));
}

/// Set the quantity of a cake.
pub fn update(config: &CliConfig, id: &str, quantity: i64) {
    let mut cart = open_cart(config);
    cart.update_quantity(&CakeId::new(id), quantity);
    emit(&render(&CartView::from(&cart)));
}

/// Empty the cart.
pub fn clear(config: &CliConfig) {
    let mut cart = open_cart(config);
    cart.clear();
    emit("Cart cleared.");
}

/// Render a cart view as a plain-text table.
pub fn render(view: &CartView) -> String {
    if view.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for item in &view.items {
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:>4} x {:>10} = {:>10}",
            item.product_id, item.name, item.quantity, item.price, item.line_price
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        view.item_count, view.subtotal
    );
    out
}

#[allow(clippy::print_stdout)]
pub(crate) fn emit(text: &str) {
    println!("{text}");
}
