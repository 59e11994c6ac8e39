use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

// Validated input structs, one per engine operation. Handlers deserialize
// these from request bodies; the engine runs `validate` before touching any
// state, so a rejected request leaves no partial effect.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFundsRequest {
    pub amount: BigDecimal,
}

impl AddFundsRequest {
    pub fn validate(&self) -> Result<(), LedgerError> {
        require_positive_amount(&self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub amount: BigDecimal,
}

impl WithdrawRequest {
    pub fn validate(&self) -> Result<(), LedgerError> {
        require_positive_amount(&self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyRequest {
    pub symbol: String,
    pub quantity: i64,
    pub price: BigDecimal,
}

impl BuyRequest {
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_trade(&self.symbol, self.quantity, &self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellRequest {
    pub symbol: String,
    pub quantity: i64,
    pub price: BigDecimal,
}

impl SellRequest {
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_trade(&self.symbol, self.quantity, &self.price)
    }
}

// HTTP body for trade endpoints: price is optional there because the handler
// may resolve it from the quote service before building the engine request.
#[derive(Debug, Deserialize)]
pub struct TradeOrder {
    pub symbol: String,
    pub quantity: i64,
    pub price: Option<BigDecimal>,
}

fn require_positive_amount(amount: &BigDecimal) -> Result<(), LedgerError> {
    if amount <= &BigDecimal::zero() {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be > 0, got {}",
            amount
        )));
    }
    Ok(())
}

fn validate_trade(symbol: &str, quantity: i64, price: &BigDecimal) -> Result<(), LedgerError> {
    if symbol.trim().is_empty() {
        return Err(LedgerError::InvalidPayload("symbol cannot be empty".into()));
    }
    if quantity <= 0 {
        return Err(LedgerError::InvalidPayload(format!(
            "quantity must be > 0, got {}",
            quantity
        )));
    }
    if price <= &BigDecimal::zero() {
        return Err(LedgerError::InvalidPayload(format!(
            "price must be > 0, got {}",
            price
        )));
    }
    Ok(())
}
