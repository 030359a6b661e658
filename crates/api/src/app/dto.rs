use serde::Deserialize;

use stockbook_catalog::Product;
use stockbook_ledger::StockMovement;
use stockbook_reports::{ActivityBucket, InventorySummary, StockAlert};

// -------------------------
// Request DTOs
// -------------------------

// Create and update bodies deserialize straight into `ProductDraft` /
// `ProductPatch`; only the adjust body needs its own shape because the
// kind arrives as a string.

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub kind: String,
    pub quantity: i64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id().to_string(),
        "name": product.name(),
        "category": product.category(),
        "sku": product.sku(),
        "stock": product.stock(),
        "min_stock": product.min_stock(),
        "price_cents": product.price_cents(),
        "status": product.status(),
        "updated_at": product.updated_at(),
    })
}

pub fn movement_to_json(movement: &StockMovement) -> serde_json::Value {
    serde_json::json!({
        "id": movement.id.to_string(),
        "product_id": movement.product_id.to_string(),
        "product_name": movement.product_name,
        "kind": movement.kind,
        "quantity": movement.quantity,
        "occurred_at": movement.occurred_at,
        "recorded_by": movement.recorded_by,
    })
}

pub fn alert_to_json(alert: &StockAlert) -> serde_json::Value {
    serde_json::json!({
        "product_id": alert.product_id.to_string(),
        "name": alert.name,
        "sku": alert.sku,
        "stock": alert.stock,
        "min_stock": alert.min_stock,
        "status": alert.status,
    })
}

pub fn activity_bucket_to_json(bucket: &ActivityBucket) -> serde_json::Value {
    serde_json::json!({
        "date": bucket.date,
        "stock_in": bucket.stock_in,
        "stock_out": bucket.stock_out,
    })
}

pub fn summary_to_json(summary: &InventorySummary) -> serde_json::Value {
    serde_json::json!({
        "total_products": summary.total_products,
        "asset_value_cents": summary.asset_value_cents.to_string(),
        "low_stock": summary.low_stock,
        "out_of_stock": summary.out_of_stock,
    })
}
