use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::price_provider::Quote;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_quote))
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, AppError> {
    info!("GET /api/prices/{} - Quote lookup", symbol);

    let quote = state.quotes.latest(&symbol).await.map_err(|e| {
        error!("Failed to fetch quote for {}: {}", symbol, e);
        AppError::PriceFeed(e)
    })?;

    Ok(Json(quote))
}
