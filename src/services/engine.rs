use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use tracing::info;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::models::{
    AddFundsRequest, BuyRequest, EntryType, FundsSummary, Holding, LedgerEntry, SellRequest,
    TradeOutcome, Wallet, WithdrawRequest,
};
use crate::services::locks::UserLocks;
use crate::services::symbols;
use crate::store::{HoldingChange, PortfolioStore, StateChange};

/// Orchestrates ADD_FUNDS / WITHDRAW / BUY / SELL as atomic operations across
/// the wallet, the holding store, and the ledger.
///
/// Every mutation follows the same shape: validate the request, take the
/// user's write lock, snapshot state, compute the full effect, then persist it
/// with a single `StateChange`. Business-rule failures are raised before the
/// snapshot is touched, so a rejected call leaves no partial effect; the store
/// guarantees the same for storage failures inside `apply`.
pub struct PortfolioEngine {
    store: Arc<dyn PortfolioStore>,
    locks: UserLocks,
}

impl PortfolioEngine {
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
        }
    }

    /// Registration hook for the identity collaborator. Idempotent.
    pub async fn register_user(&self, user_id: Uuid) -> Result<Wallet, LedgerError> {
        let wallet = self.store.create_wallet(user_id).await?;
        info!(%user_id, "wallet registered");
        Ok(wallet)
    }

    pub async fn add_funds(
        &self,
        user_id: Uuid,
        req: AddFundsRequest,
    ) -> Result<Wallet, LedgerError> {
        req.validate()?;
        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut wallet = self.require_wallet(user_id).await?;
        wallet.balance = &wallet.balance + &req.amount;
        wallet.total_deposited = &wallet.total_deposited + &req.amount;
        wallet.updated_at = chrono::Utc::now();

        let entry = LedgerEntry::funds(user_id, EntryType::AddFunds, req.amount);
        self.store
            .apply(StateChange {
                wallet: wallet.clone(),
                holding: HoldingChange::Untouched,
                entry,
            })
            .await?;

        info!(%user_id, balance = %wallet.balance, "funds added");
        Ok(wallet)
    }

    pub async fn withdraw(
        &self,
        user_id: Uuid,
        req: WithdrawRequest,
    ) -> Result<Wallet, LedgerError> {
        req.validate()?;
        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut wallet = self.require_wallet(user_id).await?;
        if wallet.balance < req.amount {
            return Err(LedgerError::InsufficientFunds {
                required: req.amount,
                available: wallet.balance,
            });
        }
        wallet.balance = &wallet.balance - &req.amount;
        wallet.updated_at = chrono::Utc::now();

        let entry = LedgerEntry::funds(user_id, EntryType::Withdraw, req.amount);
        self.store
            .apply(StateChange {
                wallet: wallet.clone(),
                holding: HoldingChange::Untouched,
                entry,
            })
            .await?;

        info!(%user_id, balance = %wallet.balance, "funds withdrawn");
        Ok(wallet)
    }

    pub async fn buy(&self, user_id: Uuid, req: BuyRequest) -> Result<TradeOutcome, LedgerError> {
        req.validate()?;
        let symbol = symbols::normalize(&req.symbol);
        if symbol.is_empty() {
            return Err(LedgerError::InvalidPayload(format!(
                "symbol {:?} is empty after normalization",
                req.symbol
            )));
        }

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut wallet = self.require_wallet(user_id).await?;
        let cost = &req.price * BigDecimal::from(req.quantity);
        if wallet.balance < cost {
            return Err(LedgerError::InsufficientFunds {
                required: cost,
                available: wallet.balance,
            });
        }

        wallet.balance = &wallet.balance - &cost;
        wallet.updated_at = chrono::Utc::now();

        let holding = match self.store.get_holding(user_id, &symbol).await? {
            Some(mut h) => {
                // Weighted-average recomputation; new_quantity > 0 always,
                // so the division cannot hit zero.
                let new_quantity = h.quantity + req.quantity;
                let blended = &h.avg_cost * BigDecimal::from(h.quantity) + &cost;
                h.avg_cost = blended / BigDecimal::from(new_quantity);
                h.quantity = new_quantity;
                h.last_price = req.price.clone();
                h.updated_at = chrono::Utc::now();
                h
            }
            None => Holding::open(user_id, symbol.clone(), req.quantity, req.price.clone()),
        };

        let entry = LedgerEntry::trade(
            user_id,
            EntryType::Buy,
            symbol,
            req.quantity,
            req.price,
            cost,
            None,
        );
        self.store
            .apply(StateChange {
                wallet: wallet.clone(),
                holding: HoldingChange::Upsert(holding.clone()),
                entry: entry.clone(),
            })
            .await?;

        info!(
            %user_id,
            symbol = %holding.symbol,
            quantity = holding.quantity,
            avg_cost = %holding.avg_cost,
            "buy committed"
        );
        Ok(TradeOutcome {
            wallet,
            holding: Some(holding),
            entry,
        })
    }

    pub async fn sell(&self, user_id: Uuid, req: SellRequest) -> Result<TradeOutcome, LedgerError> {
        req.validate()?;
        let symbol = symbols::normalize(&req.symbol);
        if symbol.is_empty() {
            return Err(LedgerError::InvalidPayload(format!(
                "symbol {:?} is empty after normalization",
                req.symbol
            )));
        }

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut wallet = self.require_wallet(user_id).await?;
        let mut holding = match self.store.get_holding(user_id, &symbol).await? {
            Some(h) => h,
            None => {
                return Err(LedgerError::InsufficientHoldings {
                    requested: req.quantity,
                    held: 0,
                })
            }
        };
        if holding.quantity < req.quantity {
            return Err(LedgerError::InsufficientHoldings {
                requested: req.quantity,
                held: holding.quantity,
            });
        }

        let proceeds = &req.price * BigDecimal::from(req.quantity);
        // Disposal at blended average cost; the remaining lot keeps its basis.
        let consumed_basis = &holding.avg_cost * BigDecimal::from(req.quantity);
        let realized_pnl = &proceeds - &consumed_basis;

        wallet.balance = &wallet.balance + &proceeds;
        wallet.updated_at = chrono::Utc::now();

        holding.quantity -= req.quantity;
        holding.last_price = req.price.clone();
        holding.updated_at = chrono::Utc::now();

        let (change, remaining) = if holding.quantity == 0 {
            (HoldingChange::Delete(symbol.clone()), None)
        } else {
            (HoldingChange::Upsert(holding.clone()), Some(holding))
        };

        let entry = LedgerEntry::trade(
            user_id,
            EntryType::Sell,
            symbol,
            req.quantity,
            req.price,
            proceeds,
            Some(realized_pnl.clone()),
        );
        self.store
            .apply(StateChange {
                wallet: wallet.clone(),
                holding: change,
                entry: entry.clone(),
            })
            .await?;

        info!(
            %user_id,
            symbol = entry.symbol.as_deref().unwrap_or_default(),
            realized_pnl = %realized_pnl,
            closed = remaining.is_none(),
            "sell committed"
        );
        Ok(TradeOutcome {
            wallet,
            holding: remaining,
            entry,
        })
    }

    pub async fn get_wallet(&self, user_id: Uuid) -> Result<Wallet, LedgerError> {
        self.require_wallet(user_id).await
    }

    pub async fn get_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, LedgerError> {
        self.require_wallet(user_id).await?;
        self.store.list_holdings(user_id).await
    }

    pub async fn get_history(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.require_wallet(user_id).await?;
        self.store.list_ledger(user_id, limit).await
    }

    /// Wallet plus totals replayed from the ledger. `reconciled` holds
    /// whenever no ledger write was ever lost: balance must equal
    /// deposits - withdrawals - buys + sells over the full history.
    pub async fn funds_summary(&self, user_id: Uuid) -> Result<FundsSummary, LedgerError> {
        let wallet = self.require_wallet(user_id).await?;
        let entries = self.store.list_ledger(user_id, None).await?;

        let mut deposits = BigDecimal::zero();
        let mut withdrawals = BigDecimal::zero();
        let mut buy_cost = BigDecimal::zero();
        let mut sell_proceeds = BigDecimal::zero();
        for entry in &entries {
            match entry.entry_type {
                EntryType::AddFunds => deposits = &deposits + &entry.amount,
                EntryType::Withdraw => withdrawals = &withdrawals + &entry.amount,
                EntryType::Buy => buy_cost = &buy_cost + &entry.amount,
                EntryType::Sell => sell_proceeds = &sell_proceeds + &entry.amount,
            }
        }
        let ledger_balance = &deposits - &withdrawals - &buy_cost + &sell_proceeds;
        let reconciled = ledger_balance == wallet.balance;

        Ok(FundsSummary {
            user_id,
            balance: wallet.balance,
            total_deposited: wallet.total_deposited,
            deposits,
            withdrawals,
            buy_cost,
            sell_proceeds,
            ledger_balance,
            reconciled,
        })
    }

    async fn require_wallet(&self, user_id: Uuid) -> Result<Wallet, LedgerError> {
        self.store
            .get_wallet(user_id)
            .await?
            .ok_or(LedgerError::NotFound)
    }
}
