use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::models::{EntryType, Holding, LedgerEntry, Wallet};
use crate::store::{HoldingChange, PortfolioStore, StateChange};

/// Postgres-backed store. `apply` runs inside one transaction so a crash
/// mid-operation can never leave a debited wallet without its holding update
/// or ledger append.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Ledger rows carry the entry type as text; decode back into the enum here.
#[derive(FromRow)]
struct LedgerRow {
    id: Uuid,
    user_id: Uuid,
    entry_type: String,
    amount: BigDecimal,
    symbol: Option<String>,
    quantity: Option<i64>,
    price: Option<BigDecimal>,
    realized_pnl: Option<BigDecimal>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl LedgerRow {
    fn into_entry(self) -> Result<LedgerEntry, LedgerError> {
        let entry_type = EntryType::parse(&self.entry_type).ok_or_else(|| {
            LedgerError::Storage(sqlx::Error::Decode(
                format!("unknown ledger entry type {:?}", self.entry_type).into(),
            ))
        })?;
        Ok(LedgerEntry {
            id: self.id,
            user_id: self.user_id,
            entry_type,
            amount: self.amount,
            symbol: self.symbol,
            quantity: self.quantity,
            price: self.price,
            realized_pnl: self.realized_pnl,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl PortfolioStore for PgStore {
    async fn create_wallet(&self, user_id: Uuid) -> Result<Wallet, LedgerError> {
        let wallet = Wallet::new(user_id);
        sqlx::query(
            "INSERT INTO wallets (user_id, balance, total_deposited, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(wallet.user_id)
        .bind(&wallet.balance)
        .bind(&wallet.total_deposited)
        .bind(wallet.created_at)
        .bind(wallet.updated_at)
        .execute(&self.pool)
        .await?;

        let existing = self.get_wallet(user_id).await?;
        existing.ok_or(LedgerError::NotFound)
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, LedgerError> {
        let wallet = sqlx::query_as::<_, Wallet>(
            "SELECT user_id, balance, total_deposited, created_at, updated_at
             FROM wallets
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(wallet)
    }

    async fn get_holding(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, LedgerError> {
        let holding = sqlx::query_as::<_, Holding>(
            "SELECT user_id, symbol, quantity, avg_cost, last_price, created_at, updated_at
             FROM holdings
             WHERE user_id = $1 AND symbol = $2",
        )
        .bind(user_id)
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;
        Ok(holding)
    }

    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, LedgerError> {
        let holdings = sqlx::query_as::<_, Holding>(
            "SELECT user_id, symbol, quantity, avg_cost, last_price, created_at, updated_at
             FROM holdings
             WHERE user_id = $1
             ORDER BY symbol",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(holdings)
    }

    async fn list_ledger(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            "SELECT id, user_id, entry_type, amount, symbol, quantity, price,
                    realized_pnl, created_at
             FROM ledger_entries
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LedgerRow::into_entry).collect()
    }

    async fn apply(&self, change: StateChange) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE wallets
             SET balance = $2, total_deposited = $3, updated_at = $4
             WHERE user_id = $1",
        )
        .bind(change.wallet.user_id)
        .bind(&change.wallet.balance)
        .bind(&change.wallet.total_deposited)
        .bind(change.wallet.updated_at)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(LedgerError::NotFound);
        }

        match &change.holding {
            HoldingChange::Upsert(h) => {
                sqlx::query(
                    "INSERT INTO holdings
                         (user_id, symbol, quantity, avg_cost, last_price, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7)
                     ON CONFLICT (user_id, symbol) DO UPDATE
                     SET quantity = EXCLUDED.quantity,
                         avg_cost = EXCLUDED.avg_cost,
                         last_price = EXCLUDED.last_price,
                         updated_at = EXCLUDED.updated_at",
                )
                .bind(h.user_id)
                .bind(&h.symbol)
                .bind(h.quantity)
                .bind(&h.avg_cost)
                .bind(&h.last_price)
                .bind(h.created_at)
                .bind(h.updated_at)
                .execute(&mut *tx)
                .await?;
            }
            HoldingChange::Delete(symbol) => {
                sqlx::query("DELETE FROM holdings WHERE user_id = $1 AND symbol = $2")
                    .bind(change.wallet.user_id)
                    .bind(symbol)
                    .execute(&mut *tx)
                    .await?;
            }
            HoldingChange::Untouched => {}
        }

        let e = &change.entry;
        sqlx::query(
            "INSERT INTO ledger_entries
                 (id, user_id, entry_type, amount, symbol, quantity, price, realized_pnl, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(e.id)
        .bind(e.user_id)
        .bind(e.entry_type.as_str())
        .bind(&e.amount)
        .bind(&e.symbol)
        .bind(e.quantity)
        .bind(&e.price)
        .bind(&e.realized_pnl)
        .bind(e.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
