mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::models::{Holding, LedgerEntry, Wallet};

#[derive(Debug, Clone)]
pub enum HoldingChange {
    Upsert(Holding),
    Delete(String),
    Untouched,
}

/// The full effect of one committed engine operation: the post-operation
/// wallet row, at most one holding upsert-or-delete, and exactly one ledger
/// append. `apply` persists all of it or none of it.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub wallet: Wallet,
    pub holding: HoldingChange,
    pub entry: LedgerEntry,
}

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Idempotent registration insert; returns the (possibly pre-existing)
    /// zero-balance wallet.
    async fn create_wallet(&self, user_id: Uuid) -> Result<Wallet, LedgerError>;

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, LedgerError>;

    async fn get_holding(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, LedgerError>;

    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, LedgerError>;

    /// Ledger entries most-recent-first, optionally truncated.
    async fn list_ledger(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<LedgerEntry>, LedgerError>;

    async fn apply(&self, change: StateChange) -> Result<(), LedgerError>;
}
