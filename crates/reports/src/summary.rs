//! Inventory summary statistics.
//!
//! Feeds the dashboard header: product count, total asset value, and how many
//! products sit in each warning band.

use serde::Serialize;

use stockbook_catalog::{Product, StockStatus};

/// Aggregate figures over the whole product table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_products: usize,
    /// Sum of `price_cents * stock`. Accumulated in i128 so large catalogs
    /// cannot overflow the multiply-and-sum.
    pub asset_value_cents: i128,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

pub fn inventory_summary(products: &[Product]) -> InventorySummary {
    let mut summary = InventorySummary {
        total_products: products.len(),
        ..InventorySummary::default()
    };

    for product in products {
        summary.asset_value_cents += i128::from(product.price_cents()) * i128::from(product.stock());
        match product.status() {
            StockStatus::Low => summary.low_stock += 1,
            StockStatus::OutOfStock => summary.out_of_stock += 1,
            StockStatus::Safe => {}
        }
    }

    summary
}
