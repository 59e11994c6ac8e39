use bigdecimal::BigDecimal;
use serde::Serialize;

// Read-model for one priced holding. Market-dependent fields are None when
// no usable live price was available; the position's own invested figures are
// always present.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub quantity: i64,
    pub avg_cost: BigDecimal,
    pub invested: BigDecimal,
    pub current_price: Option<BigDecimal>,
    pub current_value: Option<BigDecimal>,
    pub unrealized_pnl: Option<BigDecimal>,
    pub unrealized_pnl_percent: Option<BigDecimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioValuation {
    pub total_invested: BigDecimal,
    // Totals over priced holdings only.
    pub total_current_value: BigDecimal,
    pub total_unrealized_pnl: BigDecimal,
    pub priced_holdings: usize,
    pub unpriced_holdings: usize,
    pub holdings: Vec<HoldingValuation>,
}
