//! Read-side derivations over the ledger: daily activity buckets, stock
//! alerts, and summary statistics.
//!
//! Everything here is a pure function over snapshots. Nothing is cached or
//! maintained incrementally; callers recompute from current state on every
//! read, so a report can never drift from the ledger it describes.

pub mod activity;
pub mod alerts;
pub mod summary;

pub use activity::{daily_activity, ActivityBucket};
pub use alerts::{low_stock_alerts, StockAlert};
pub use summary::{inventory_summary, InventorySummary};
