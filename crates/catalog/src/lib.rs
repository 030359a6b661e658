//! Product catalog domain module.
//!
//! This crate contains business rules for product records, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod status;

pub use product::{Product, ProductDraft, ProductPatch, DEFAULT_MIN_STOCK};
pub use status::{classify, StockStatus};
