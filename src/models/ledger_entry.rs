use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    AddFunds,
    Withdraw,
    Buy,
    Sell,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::AddFunds => "ADD_FUNDS",
            EntryType::Withdraw => "WITHDRAW",
            EntryType::Buy => "BUY",
            EntryType::Sell => "SELL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADD_FUNDS" => Some(EntryType::AddFunds),
            "WITHDRAW" => Some(EntryType::Withdraw),
            "BUY" => Some(EntryType::Buy),
            "SELL" => Some(EntryType::Sell),
            _ => None,
        }
    }
}

// Append-only history of every wallet- and holding-affecting event.
// `amount` is always a positive magnitude; `entry_type` carries the direction.
// Entries are never mutated or deleted after the operation that wrote them
// commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub entry_type: EntryType,
    pub amount: BigDecimal,
    pub symbol: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<BigDecimal>,
    pub realized_pnl: Option<BigDecimal>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl LedgerEntry {
    pub fn funds(user_id: uuid::Uuid, entry_type: EntryType, amount: BigDecimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            entry_type,
            amount,
            symbol: None,
            quantity: None,
            price: None,
            realized_pnl: None,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn trade(
        user_id: uuid::Uuid,
        entry_type: EntryType,
        symbol: String,
        quantity: i64,
        price: BigDecimal,
        amount: BigDecimal,
        realized_pnl: Option<BigDecimal>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            entry_type,
            amount,
            symbol: Some(symbol),
            quantity: Some(quantity),
            price: Some(price),
            realized_pnl,
            created_at: chrono::Utc::now(),
        }
    }
}
