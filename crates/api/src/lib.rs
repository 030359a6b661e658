//! HTTP surface of the stock ledger: router construction, bearer-token
//! middleware, and JSON mapping.

pub mod app;
pub mod middleware;
