use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::models::{Holding, LedgerEntry, Wallet};
use crate::store::{HoldingChange, PortfolioStore, StateChange};

/// In-process store used by tests and as the no-database dev mode. The
/// engine serializes writes per user, so `apply` never races with itself for
/// the same user; reads may observe an operation mid-apply, which the read
/// path tolerates.
#[derive(Default)]
pub struct MemoryStore {
    wallets: DashMap<Uuid, Wallet>,
    holdings: DashMap<Uuid, BTreeMap<String, Holding>>,
    ledger: Mutex<Vec<LedgerEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn create_wallet(&self, user_id: Uuid) -> Result<Wallet, LedgerError> {
        let wallet = self
            .wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id))
            .clone();
        Ok(wallet)
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, LedgerError> {
        Ok(self.wallets.get(&user_id).map(|w| w.clone()))
    }

    async fn get_holding(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, LedgerError> {
        Ok(self
            .holdings
            .get(&user_id)
            .and_then(|m| m.get(symbol).cloned()))
    }

    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, LedgerError> {
        Ok(self
            .holdings
            .get(&user_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_ledger(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let ledger = self.ledger.lock();
        let mut entries: Vec<LedgerEntry> = ledger
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Append order is chronological; the contract is most-recent-first.
        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit.max(0) as usize);
        }
        Ok(entries)
    }

    async fn apply(&self, change: StateChange) -> Result<(), LedgerError> {
        let user_id = change.wallet.user_id;
        self.wallets.insert(user_id, change.wallet);
        match change.holding {
            HoldingChange::Upsert(holding) => {
                self.holdings
                    .entry(user_id)
                    .or_default()
                    .insert(holding.symbol.clone(), holding);
            }
            HoldingChange::Delete(symbol) => {
                if let Some(mut map) = self.holdings.get_mut(&user_id) {
                    map.remove(&symbol);
                }
            }
            HoldingChange::Untouched => {}
        }
        self.ledger.lock().push(change.entry);
        Ok(())
    }
}
