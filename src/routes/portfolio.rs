use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Holding, LedgerEntry, PortfolioValuation};
use crate::services::valuation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/holdings", get(list_holdings))
        .route("/:user_id/holdings/valuation", get(portfolio_valuation))
        .route("/:user_id/history", get(history))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

pub async fn list_holdings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Holding>>, AppError> {
    info!("GET /api/users/{}/holdings - Listing holdings", user_id);

    let holdings = state.engine.get_holdings(user_id).await?;
    Ok(Json(holdings))
}

pub async fn portfolio_valuation(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PortfolioValuation>, AppError> {
    info!("GET /api/users/{}/holdings/valuation - Valuing portfolio", user_id);

    let holdings = state.engine.get_holdings(user_id).await?;
    let symbols: Vec<&str> = holdings.iter().map(|h| h.symbol.as_str()).collect();
    let prices = state.quotes.prices_for(symbols).await;

    Ok(Json(valuation::project_portfolio(&holdings, &prices)))
}

pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    info!("GET /api/users/{}/history - Listing ledger entries", user_id);

    let entries = state.engine.get_history(user_id, params.limit).await?;
    Ok(Json(entries))
}
