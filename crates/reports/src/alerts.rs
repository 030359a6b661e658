//! Stock alert derivation.
//!
//! Alerts are computed from the product list on demand and never stored, so
//! an adjustment that lifts a product back over its threshold clears the
//! alert on the very next read.

use serde::Serialize;

use stockbook_catalog::{Product, StockStatus};
use stockbook_core::ProductId;

/// One product needing attention, with enough context to render a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub min_stock: i64,
    pub status: StockStatus,
}

/// Every product whose band is not Safe, most urgent (lowest stock) first.
pub fn low_stock_alerts(products: &[Product]) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = products
        .iter()
        .filter(|p| p.status() != StockStatus::Safe)
        .map(|p| StockAlert {
            product_id: p.id(),
            name: p.name().to_string(),
            sku: p.sku().to_string(),
            stock: p.stock(),
            min_stock: p.min_stock(),
            status: p.status(),
        })
        .collect();
    alerts.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
    alerts
}
