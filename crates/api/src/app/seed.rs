//! Demo catalog seeding.

use chrono::Utc;

use stockbook_catalog::ProductDraft;

use crate::app::services::AppServices;

/// Recorder name stamped on seeded opening movements.
const SEED_RECORDER: &str = "Seed";

/// Load the demo catalog through the regular write path, so opening stock
/// shows up in the movement log like any other adjustment.
///
/// Failures (e.g. a SKU that already exists after a restart) are logged and
/// skipped.
pub fn seed_demo(services: &AppServices) {
    for draft in demo_drafts() {
        let sku = draft.sku.clone();
        if let Err(e) = services.ledger().create_product(draft, SEED_RECORDER, Utc::now()) {
            tracing::warn!("seed skipped {}: {}", sku, e);
        }
    }
    tracing::info!("demo catalog seeded");
}

fn demo_drafts() -> Vec<ProductDraft> {
    vec![
        ProductDraft {
            name: "MacBook Pro M3 14\"".to_string(),
            category: "Electronics".to_string(),
            sku: "LAP-001".to_string(),
            price_cents: 199_900,
            stock: 12,
            min_stock: Some(10),
        },
        ProductDraft {
            name: "iPhone 15 Pro Max".to_string(),
            category: "Electronics".to_string(),
            sku: "PHN-001".to_string(),
            price_cents: 119_900,
            stock: 5,
            min_stock: Some(8),
        },
    ]
}

#[cfg(test)]
mod tests {
    use stockbook_ledger::{MovementQuery, ProductQuery};

    use super::*;
    use crate::app::services::build_services;

    #[test]
    fn seeding_creates_products_with_opening_movements() {
        let services = build_services();
        seed_demo(&services);

        let products = services.ledger().products(&ProductQuery::default()).unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().any(|p| p.sku() == "LAP-001"));
        assert!(products.iter().any(|p| p.sku() == "PHN-001"));

        let movements = services.ledger().movements(&MovementQuery::default()).unwrap();
        assert_eq!(movements.len(), 2);
        assert!(movements.iter().all(|m| m.recorded_by == SEED_RECORDER));
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let services = build_services();
        seed_demo(&services);
        seed_demo(&services);

        let products = services.ledger().products(&ProductQuery::default()).unwrap();
        assert_eq!(products.len(), 2);
    }
}
