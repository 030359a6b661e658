use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockbook_catalog::Product;
use stockbook_core::{LedgerError, LedgerResult, ProductId};

use crate::movement::StockMovement;

/// Storage abstraction for the product table and the movement log.
///
/// The two commit operations are the only ways stock reaches storage, and both
/// are atomic: the product row and any accompanying log entry land together or
/// not at all. Commits carry the product version the writer read; a mismatch
/// against the stored version fails with [`LedgerError::Conflict`] and leaves
/// the store untouched.
pub trait LedgerStore: Send + Sync {
    /// Insert a brand-new product, with its opening IN movement when the
    /// draft carried initial stock. Rejects duplicate ids and duplicate SKUs.
    fn insert_product(
        &self,
        product: Product,
        opening: Option<StockMovement>,
    ) -> LedgerResult<()>;

    /// Replace a product's record if the stored version still matches
    /// `expected_version`.
    fn commit_product(&self, expected_version: u64, product: Product) -> LedgerResult<()>;

    /// Replace a product's record and append one movement, atomically.
    fn commit_adjustment(
        &self,
        expected_version: u64,
        product: Product,
        movement: StockMovement,
    ) -> LedgerResult<()>;

    /// Remove a product. Its movements stay in the log.
    fn remove_product(&self, id: ProductId) -> LedgerResult<()>;

    fn get_product(&self, id: ProductId) -> LedgerResult<Option<Product>>;

    /// Snapshot of all products, in no particular order.
    fn list_products(&self) -> LedgerResult<Vec<Product>>;

    /// Snapshot of the whole movement log, in append order.
    fn list_movements(&self) -> LedgerResult<Vec<StockMovement>>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn insert_product(
        &self,
        product: Product,
        opening: Option<StockMovement>,
    ) -> LedgerResult<()> {
        (**self).insert_product(product, opening)
    }

    fn commit_product(&self, expected_version: u64, product: Product) -> LedgerResult<()> {
        (**self).commit_product(expected_version, product)
    }

    fn commit_adjustment(
        &self,
        expected_version: u64,
        product: Product,
        movement: StockMovement,
    ) -> LedgerResult<()> {
        (**self).commit_adjustment(expected_version, product, movement)
    }

    fn remove_product(&self, id: ProductId) -> LedgerResult<()> {
        (**self).remove_product(id)
    }

    fn get_product(&self, id: ProductId) -> LedgerResult<Option<Product>> {
        (**self).get_product(id)
    }

    fn list_products(&self) -> LedgerResult<Vec<Product>> {
        (**self).list_products()
    }

    fn list_movements(&self) -> LedgerResult<Vec<StockMovement>> {
        (**self).list_movements()
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    products: HashMap<ProductId, Product>,
    movements: Vec<StockMovement>,
}

/// In-memory ledger store.
///
/// One lock guards both tables, so every commit and every read sees a
/// consistent pairing of product rows and log entries. Intended for tests/dev
/// and single-process deployments; not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert_product(
        &self,
        product: Product,
        opening: Option<StockMovement>,
    ) -> LedgerResult<()> {
        let mut state = write_lock(&self.state)?;

        if state.products.contains_key(&product.id()) {
            return Err(LedgerError::conflict("product id already exists"));
        }
        if state.products.values().any(|p| p.sku() == product.sku()) {
            return Err(LedgerError::conflict("SKU already exists"));
        }
        if let Some(movement) = &opening {
            if movement.product_id != product.id() {
                return Err(LedgerError::internal(
                    "opening movement targets a different product",
                ));
            }
        }

        state.products.insert(product.id(), product);
        if let Some(movement) = opening {
            state.movements.push(movement);
        }
        Ok(())
    }

    fn commit_product(&self, expected_version: u64, product: Product) -> LedgerResult<()> {
        let mut state = write_lock(&self.state)?;
        let slot = state
            .products
            .get_mut(&product.id())
            .ok_or(LedgerError::NotFound)?;

        if slot.version() != expected_version {
            return Err(LedgerError::conflict(format!(
                "version conflict: expected {expected_version}, found {}",
                slot.version()
            )));
        }

        *slot = product;
        Ok(())
    }

    fn commit_adjustment(
        &self,
        expected_version: u64,
        product: Product,
        movement: StockMovement,
    ) -> LedgerResult<()> {
        if movement.product_id != product.id() {
            return Err(LedgerError::internal(
                "movement targets a different product",
            ));
        }

        let mut state = write_lock(&self.state)?;
        let slot = state
            .products
            .get_mut(&product.id())
            .ok_or(LedgerError::NotFound)?;

        if slot.version() != expected_version {
            return Err(LedgerError::conflict(format!(
                "version conflict: expected {expected_version}, found {}",
                slot.version()
            )));
        }

        *slot = product;
        state.movements.push(movement);
        Ok(())
    }

    fn remove_product(&self, id: ProductId) -> LedgerResult<()> {
        let mut state = write_lock(&self.state)?;
        match state.products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(LedgerError::NotFound),
        }
    }

    fn get_product(&self, id: ProductId) -> LedgerResult<Option<Product>> {
        let state = read_lock(&self.state)?;
        Ok(state.products.get(&id).cloned())
    }

    fn list_products(&self) -> LedgerResult<Vec<Product>> {
        let state = read_lock(&self.state)?;
        Ok(state.products.values().cloned().collect())
    }

    fn list_movements(&self) -> LedgerResult<Vec<StockMovement>> {
        let state = read_lock(&self.state)?;
        Ok(state.movements.clone())
    }
}

fn write_lock(
    state: &RwLock<LedgerState>,
) -> LedgerResult<std::sync::RwLockWriteGuard<'_, LedgerState>> {
    state
        .write()
        .map_err(|_| LedgerError::internal("lock poisoned"))
}

fn read_lock(
    state: &RwLock<LedgerState>,
) -> LedgerResult<std::sync::RwLockReadGuard<'_, LedgerState>> {
    state
        .read()
        .map_err(|_| LedgerError::internal("lock poisoned"))
}
