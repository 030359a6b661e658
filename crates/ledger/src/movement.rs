use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{LedgerError, MovementId, ProductId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    In,
    Out,
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
        })
    }
}

impl FromStr for MovementKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(MovementKind::In),
            "OUT" => Ok(MovementKind::Out),
            other => Err(LedgerError::validation(format!(
                "unknown movement kind: {other}"
            ))),
        }
    }
}

/// One entry in the append-only movement log.
///
/// `product_name` is a snapshot taken when the movement was recorded, so log
/// entries stay readable after the product is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub product_name: String,
    pub kind: MovementKind,
    /// Strictly positive; the direction lives in `kind`.
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
    /// Display name of the principal who recorded the movement.
    pub recorded_by: String,
}

impl StockMovement {
    /// Quantity with the direction applied: positive for IN, negative for OUT.
    pub fn signed_quantity(&self) -> i64 {
        match self.kind {
            MovementKind::In => self.quantity,
            MovementKind::Out => -self.quantity,
        }
    }
}

/// Net stock change across a set of movements.
///
/// Replaying every movement of a product through this function must reproduce
/// its current stock.
pub fn net_quantity<'a>(movements: impl IntoIterator<Item = &'a StockMovement>) -> i64 {
    movements.into_iter().map(StockMovement::signed_quantity).sum()
}

/// Command: apply one stock movement to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: MovementKind, quantity: i64) -> StockMovement {
        StockMovement {
            id: MovementId::new(),
            product_id: ProductId::new(),
            product_name: "Test Widget".to_string(),
            kind,
            quantity,
            occurred_at: Utc::now(),
            recorded_by: "Alex Chen".to_string(),
        }
    }

    #[test]
    fn kind_serializes_to_wire_form() {
        assert_eq!(serde_json::to_string(&MovementKind::In).unwrap(), "\"IN\"");
        assert_eq!(serde_json::to_string(&MovementKind::Out).unwrap(), "\"OUT\"");
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("in".parse::<MovementKind>().unwrap(), MovementKind::In);
        assert_eq!("OUT".parse::<MovementKind>().unwrap(), MovementKind::Out);
        assert!("SIDEWAYS".parse::<MovementKind>().is_err());
    }

    #[test]
    fn signed_quantity_carries_direction() {
        assert_eq!(movement(MovementKind::In, 7).signed_quantity(), 7);
        assert_eq!(movement(MovementKind::Out, 7).signed_quantity(), -7);
    }

    #[test]
    fn net_quantity_sums_in_minus_out() {
        let log = [
            movement(MovementKind::In, 10),
            movement(MovementKind::Out, 3),
            movement(MovementKind::In, 5),
            movement(MovementKind::Out, 2),
        ];
        assert_eq!(net_quantity(&log), 10);
    }
}
