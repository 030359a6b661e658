//! Service wiring shared by every handler.

use std::sync::Arc;

use stockbook_ledger::{InMemoryLedgerStore, Ledger};

/// Application services handed to handlers via `Extension<Arc<AppServices>>`.
///
/// All reads and writes flow through the one [`Ledger`]; there is no other
/// path to product or movement state.
pub struct AppServices {
    ledger: Ledger<Arc<InMemoryLedgerStore>>,
}

impl AppServices {
    pub fn ledger(&self) -> &Ledger<Arc<InMemoryLedgerStore>> {
        &self.ledger
    }
}

/// In-memory service wiring (dev/test and single-node deployments).
pub fn build_services() -> AppServices {
    let store = Arc::new(InMemoryLedgerStore::new());
    AppServices {
        ledger: Ledger::new(store),
    }
}
