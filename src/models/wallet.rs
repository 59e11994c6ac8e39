use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Spendable balance ("points") for one user. Mutated only through the
// portfolio engine; `total_deposited` is a lifetime counter and never goes
// down.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    pub user_id: uuid::Uuid,
    pub balance: BigDecimal,
    pub total_deposited: BigDecimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Wallet {
    pub fn new(user_id: uuid::Uuid) -> Self {
        let now = chrono::Utc::now();
        Self {
            user_id,
            balance: BigDecimal::zero(),
            total_deposited: BigDecimal::zero(),
            created_at: now,
            updated_at: now,
        }
    }
}
