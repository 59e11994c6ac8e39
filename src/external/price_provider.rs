use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Serialize;
use thiserror::Error;

/// Latest traded price for one symbol, as reported by a provider.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: BigDecimal,
    pub as_of: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("symbol not found: {0}")]
    UnknownSymbol(String),
}

/// External market-data collaborator. The portfolio engine never calls this;
/// callers resolve a price first and pass it in, so no lock is ever held
/// across a network round trip.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, PriceProviderError>;
}
