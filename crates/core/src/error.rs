//! Ledger error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns surface as `Internal` or,
/// on the calling side, `Transport`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (e.g. malformed or out-of-range input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An OUT adjustment asked for more units than the product holds.
    #[error("insufficient stock: requested {requested}, on hand {on_hand}")]
    InsufficientStock { requested: i64, on_hand: i64 },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// A conflict occurred (duplicate SKU, stale version).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The principal is missing or not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,

    /// Failure reaching the ledger (connection refused, timeout). Produced
    /// only on the calling side, never by the ledger itself.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Unexpected infrastructure failure (e.g. poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_stock(requested: i64, on_hand: i64) -> Self {
        Self::InsufficientStock { requested, on_hand }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a caller may safely retry the same request unchanged.
    ///
    /// Validation and insufficient-stock failures are deterministic: the same
    /// input fails the same way until state changes. Only transport failures
    /// qualify for blind retry.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
