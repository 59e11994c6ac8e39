use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bigdecimal::BigDecimal;
use serde_json::json;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

/// Typed failure taxonomy of the portfolio ledger. Every business-rule
/// violation is detected before any mutation begins, so a returned error
/// always means "nothing changed".
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: BigDecimal,
        available: BigDecimal,
    },
    #[error("insufficient holdings: requested {requested}, held {held}")]
    InsufficientHoldings { requested: i64, held: i64 },
    #[error("user not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::InvalidPayload(_) => "INVALID_PAYLOAD",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::InsufficientHoldings { .. } => "INSUFFICIENT_HOLDINGS",
            LedgerError::NotFound => "NOT_FOUND",
            LedgerError::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

/// HTTP-facing error wrapper for the route layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("price feed error: {0}")]
    PriceFeed(#[from] PriceProviderError),
    #[error("no usable price for {0}")]
    PriceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, message) = match &self {
            AppError::Ledger(e) => {
                let status = match e {
                    LedgerError::InvalidAmount(_) | LedgerError::InvalidPayload(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    LedgerError::InsufficientFunds { .. }
                    | LedgerError::InsufficientHoldings { .. } => StatusCode::CONFLICT,
                    LedgerError::NotFound => StatusCode::NOT_FOUND,
                    LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match e {
                    // Never leak driver details to the client.
                    LedgerError::Storage(_) => "internal storage error".to_string(),
                    other => other.to_string(),
                };
                (status, e.kind(), message)
            }
            AppError::PriceFeed(PriceProviderError::RateLimited) => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                let body = Json(json!({
                    "error": "RATE_LIMITED",
                    "message": "rate limited by price provider",
                }));
                return (StatusCode::TOO_MANY_REQUESTS, headers, body).into_response();
            }
            AppError::PriceFeed(e) => (StatusCode::BAD_GATEWAY, "PRICE_FEED", e.to_string()),
            AppError::PriceUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "PRICE_UNAVAILABLE", self.to_string())
            }
        };
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}
