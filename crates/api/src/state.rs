use std::sync::Arc;

use festago_core::clock::Clock;
use festago_core::entry_code::EntryCodeCodec;
use festago_core::ledger::CapacityLedger;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: festago_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Serialisation point for every ticket capacity change.
    pub ledger: Arc<dyn CapacityLedger>,
    /// Source of "now" for every domain decision.
    pub clock: Arc<dyn Clock>,
    /// Entry-code signer/verifier built from `config.entry_code`.
    pub entry_codes: EntryCodeCodec,
}

impl AppState {
    /// Wire the production collaborators: the row-locking ledger over
    /// `pool` and the system clock.
    pub fn new(pool: festago_db::DbPool, config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        let entry_codes = EntryCodeCodec::new(&config.entry_code.secret);
        let ledger = Arc::new(festago_db::ledger::PgCapacityLedger::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            ledger,
            clock,
            entry_codes,
        }
    }
}
