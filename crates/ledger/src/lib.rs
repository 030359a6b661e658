//! Stock ledger: the append-only movement log, the backing store, and the
//! service that owns every write to product stock.
//!
//! Domain rules live in `stockbook-catalog`; this crate wires them to a store
//! with optimistic concurrency so that each successful adjustment commits the
//! product row and its log entry together.

pub mod movement;
pub mod service;
pub mod store;

pub use movement::{net_quantity, Adjustment, MovementKind, StockMovement};
pub use service::{Ledger, MovementQuery, ProductQuery};
pub use store::{InMemoryLedgerStore, LedgerStore};
