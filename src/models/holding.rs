use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// One open position: quantity held plus the quantity-weighted average
// purchase price. A row only exists while quantity > 0; selling down to zero
// deletes it instead of leaving a zero row behind.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holding {
    pub user_id: uuid::Uuid,
    pub symbol: String,
    pub quantity: i64,
    pub avg_cost: BigDecimal,
    // Last transaction price seen for this symbol. Informational only;
    // valuation always uses an externally supplied live price.
    pub last_price: BigDecimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Holding {
    /// First buy of a symbol opens the position at the trade price.
    pub fn open(user_id: uuid::Uuid, symbol: String, quantity: i64, price: BigDecimal) -> Self {
        let now = chrono::Utc::now();
        Self {
            user_id,
            symbol,
            quantity,
            avg_cost: price.clone(),
            last_price: price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Capital still tied up in this position at average cost.
    pub fn cost_basis(&self) -> BigDecimal {
        &self.avg_cost * BigDecimal::from(self.quantity)
    }
}
