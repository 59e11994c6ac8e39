use bigdecimal::BigDecimal;
use serde::Serialize;

use super::{Holding, LedgerEntry, Wallet};

// Full result of one BUY or SELL: the updated wallet, the updated holding
// (None when the sell closed the position), and the ledger entry the
// operation appended.
#[derive(Debug, Clone, Serialize)]
pub struct TradeOutcome {
    pub wallet: Wallet,
    pub holding: Option<Holding>,
    pub entry: LedgerEntry,
}

// Wallet state next to totals re-derived from the ledger. `ledger_balance`
// replays ADD_FUNDS - WITHDRAW - BUY + SELL; `reconciled` says whether that
// replay matches the stored balance.
#[derive(Debug, Clone, Serialize)]
pub struct FundsSummary {
    pub user_id: uuid::Uuid,
    pub balance: BigDecimal,
    pub total_deposited: BigDecimal,
    pub deposits: BigDecimal,
    pub withdrawals: BigDecimal,
    pub buy_cost: BigDecimal,
    pub sell_proceeds: BigDecimal,
    pub ledger_balance: BigDecimal,
    pub reconciled: bool,
}
