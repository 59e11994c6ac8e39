use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};

use crate::models::{Holding, HoldingValuation, PortfolioValuation};

/// Price a single holding against a live quote. A missing or non-positive
/// price is a sentinel ("market value unknown"), never an error: quote feeds
/// drop out transiently and the invested-side numbers are still useful.
pub fn project_holding(holding: &Holding, current_price: Option<&BigDecimal>) -> HoldingValuation {
    let invested = holding.cost_basis();
    let price = current_price.filter(|p| *p > &BigDecimal::zero());

    let (current_value, unrealized_pnl, unrealized_pnl_percent) = match price {
        Some(p) => {
            let value = p * BigDecimal::from(holding.quantity);
            let pnl = &value - &invested;
            let percent = if invested.is_zero() {
                BigDecimal::zero()
            } else {
                &pnl * BigDecimal::from(100) / &invested
            };
            (Some(value), Some(pnl), Some(percent))
        }
        None => (None, None, None),
    };

    HoldingValuation {
        symbol: holding.symbol.clone(),
        quantity: holding.quantity,
        avg_cost: holding.avg_cost.clone(),
        invested,
        current_price: price.cloned(),
        current_value,
        unrealized_pnl,
        unrealized_pnl_percent,
    }
}

/// Aggregate projection over a user's holdings. Unpriced symbols count toward
/// invested capital only; the caller can see from the counts how complete the
/// market-value totals are.
pub fn project_portfolio(
    holdings: &[Holding],
    prices: &HashMap<String, BigDecimal>,
) -> PortfolioValuation {
    let mut total_invested = BigDecimal::zero();
    let mut total_current_value = BigDecimal::zero();
    let mut total_unrealized_pnl = BigDecimal::zero();
    let mut priced = 0;
    let mut unpriced = 0;
    let mut projected = Vec::with_capacity(holdings.len());

    for holding in holdings {
        let valuation = project_holding(holding, prices.get(&holding.symbol));
        total_invested = &total_invested + &valuation.invested;
        match (&valuation.current_value, &valuation.unrealized_pnl) {
            (Some(value), Some(pnl)) => {
                total_current_value = &total_current_value + value;
                total_unrealized_pnl = &total_unrealized_pnl + pnl;
                priced += 1;
            }
            _ => unpriced += 1,
        }
        projected.push(valuation);
    }

    PortfolioValuation {
        total_invested,
        total_current_value,
        total_unrealized_pnl,
        priced_holdings: priced,
        unpriced_holdings: unpriced,
        holdings: projected,
    }
}
