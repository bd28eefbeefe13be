//! Order history command.

use std::fmt::Write as _;

use bakehouse_cart::view::format_price;
use bakehouse_cart::{HttpOrderApi, OrderApiError, OrderSummary};

use super::cart::emit;
use crate::config::CliConfig;

/// List the signed-in customer's orders.
///
/// # Errors
///
/// Returns an error if no token is configured or the request fails.
pub async fn list(config: &CliConfig) -> Result<(), OrderApiError> {
    let api = HttpOrderApi::new(config.api_url.clone(), config.api_token.clone())?;
    let orders = api.my_orders().await?;
    tracing::debug!(count = orders.len(), "Fetched orders");
    emit(&render(&orders));
    Ok(())
}

/// Render orders as plain text, most recent first as returned by the API.
pub fn render(orders: &[OrderSummary]) -> String {
    if orders.is_empty() {
        return "No orders yet.".to_string();
    }

    let mut out = String::new();
    for order in orders {
        let placed = order
            .created_at
            .map_or_else(String::new, |at| at.format(" on %d %b %Y").to_string());
        let _ = writeln!(
            out,
            "Order {} [{}]{} - {}",
            order.id,
            order.status.label(),
            placed,
            format_price(order.total_amount)
        );
        for item in &order.items {
            let name = item
                .cake
                .as_ref()
                .map_or("(removed cake)", |cake| cake.name.as_str());
            let _ = writeln!(out, "  {} x {} @ {}", item.quantity, name, format_price(item.price));
        }
    }
    out.trim_end().to_string()
}
