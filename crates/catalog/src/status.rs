use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockbook_core::LedgerError;

/// Stock band of a product, derived from quantity and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Safe,
    Low,
    OutOfStock,
}

/// Classify a quantity against its minimum-stock threshold.
///
/// Zero (or negative) stock is always out-of-stock, whatever the threshold.
/// Sitting exactly at the threshold counts as safe.
pub fn classify(stock: i64, min_stock: i64) -> StockStatus {
    if stock <= 0 {
        StockStatus::OutOfStock
    } else if stock < min_stock {
        StockStatus::Low
    } else {
        StockStatus::Safe
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            StockStatus::Safe => "SAFE",
            StockStatus::Low => "LOW",
            StockStatus::OutOfStock => "OUT_OF_STOCK",
        };
        f.write_str(s)
    }
}

impl FromStr for StockStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAFE" => Ok(StockStatus::Safe),
            "LOW" => Ok(StockStatus::Low),
            "OUT_OF_STOCK" => Ok(StockStatus::OutOfStock),
            other => Err(LedgerError::validation(format!(
                "unknown stock status: {other}"
            ))),
        }
    }
}
