//! `stockbook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers and the ledger error taxonomy shared by every
//! other crate in the workspace.

pub mod error;
pub mod id;

pub use error::{LedgerError, LedgerResult};
pub use id::{MovementId, PrincipalId, ProductId};
