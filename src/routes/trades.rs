use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use bigdecimal::BigDecimal;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{BuyRequest, SellRequest, TradeOrder, TradeOutcome};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/trades/buy", post(buy))
        .route("/:user_id/trades/sell", post(sell))
}

pub async fn buy(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(order): Json<TradeOrder>,
) -> Result<Json<TradeOutcome>, AppError> {
    info!("POST /api/users/{}/trades/buy - {} x{}", user_id, order.symbol, order.quantity);

    let price = resolve_price(&state, &order).await?;
    let outcome = state
        .engine
        .buy(
            user_id,
            BuyRequest {
                symbol: order.symbol,
                quantity: order.quantity,
                price,
            },
        )
        .await
        .map_err(|e| {
            error!("Buy failed for {}: {}", user_id, e);
            e
        })?;

    Ok(Json(outcome))
}

pub async fn sell(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(order): Json<TradeOrder>,
) -> Result<Json<TradeOutcome>, AppError> {
    info!("POST /api/users/{}/trades/sell - {} x{}", user_id, order.symbol, order.quantity);

    let price = resolve_price(&state, &order).await?;
    let outcome = state
        .engine
        .sell(
            user_id,
            SellRequest {
                symbol: order.symbol,
                quantity: order.quantity,
                price,
            },
        )
        .await
        .map_err(|e| {
            error!("Sell failed for {}: {}", user_id, e);
            e
        })?;

    Ok(Json(outcome))
}

// The engine takes price as an already-resolved input, so any quote fetch
// happens here, before a user lock exists anywhere.
async fn resolve_price(state: &AppState, order: &TradeOrder) -> Result<BigDecimal, AppError> {
    if let Some(price) = &order.price {
        return Ok(price.clone());
    }
    let quote = state
        .quotes
        .latest(&order.symbol)
        .await
        .map_err(|e| {
            error!("Price resolution failed for {}: {}", order.symbol, e);
            AppError::PriceUnavailable(order.symbol.clone())
        })?;
    Ok(quote.price)
}
