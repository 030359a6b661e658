use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{LedgerError, ProductId};

use crate::status::{classify, StockStatus};

/// Minimum-stock threshold applied when a draft does not name one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Canonical product record.
///
/// `stock` is owned by the adjustment path: the only mutators are
/// [`Product::receive`] and [`Product::issue`], so a stored product can never
/// hold a negative quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    sku: String,
    stock: i64,
    min_stock: i64,
    price_cents: i64,
    updated_at: DateTime<Utc>,
    version: u64,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub sku: String,
    pub price_cents: i64,
    /// Opening quantity. The ledger records it as an IN movement when positive.
    #[serde(default)]
    pub stock: i64,
    pub min_stock: Option<i64>,
}

/// Partial update of a product's descriptive fields.
///
/// Deliberately has no `stock` and no `sku` field: stock moves only through
/// adjustments (each one leaves a log entry), and SKUs are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub min_stock: Option<i64>,
}

impl Product {
    /// Validate a draft and build the record. Fields are stored trimmed.
    pub fn create(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Result<Self, LedgerError> {
        let name = non_empty("name", &draft.name)?;
        let category = non_empty("category", &draft.category)?;
        let sku = non_empty("SKU", &draft.sku)?;

        if draft.price_cents < 0 {
            return Err(LedgerError::validation("price cannot be negative"));
        }
        if draft.stock < 0 {
            return Err(LedgerError::validation("initial stock cannot be negative"));
        }
        let min_stock = draft.min_stock.unwrap_or(DEFAULT_MIN_STOCK);
        if min_stock < 0 {
            return Err(LedgerError::validation("minimum stock cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            category,
            sku,
            stock: draft.stock,
            min_stock,
            price_cents: draft.price_cents,
            updated_at: now,
            version: 1,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Revision counter used for optimistic concurrency. Bumped by every
    /// successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Stock band derived from the current quantity and threshold.
    pub fn status(&self) -> StockStatus {
        classify(self.stock, self.min_stock)
    }

    /// Apply a descriptive-field patch. Absent fields are left untouched.
    pub fn apply_patch(&mut self, patch: &ProductPatch, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if let Some(name) = &patch.name {
            self.name = non_empty("name", name)?;
        }
        if let Some(category) = &patch.category {
            self.category = non_empty("category", category)?;
        }
        if let Some(price_cents) = patch.price_cents {
            if price_cents < 0 {
                return Err(LedgerError::validation("price cannot be negative"));
            }
            self.price_cents = price_cents;
        }
        if let Some(min_stock) = patch.min_stock {
            if min_stock < 0 {
                return Err(LedgerError::validation("minimum stock cannot be negative"));
            }
            self.min_stock = min_stock;
        }
        self.touch(now);
        Ok(())
    }

    /// Add incoming units. The total must stay within the i64 range.
    pub fn receive(&mut self, quantity: i64, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::validation("quantity must be positive"));
        }
        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::validation("stock out of range"))?;
        self.touch(now);
        Ok(())
    }

    /// Remove outgoing units. Stock cannot go negative; an oversized issue is
    /// rejected whole, never partially applied.
    pub fn issue(&mut self, quantity: i64, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::validation("quantity must be positive"));
        }
        if quantity > self.stock {
            return Err(LedgerError::insufficient_stock(quantity, self.stock));
        }
        self.stock -= quantity;
        self.touch(now);
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}

fn non_empty(field: &str, value: &str) -> Result<String, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
