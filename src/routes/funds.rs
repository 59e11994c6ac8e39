use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AddFundsRequest, FundsSummary, Wallet, WithdrawRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/register", post(register))
        .route("/:user_id/funds/add", post(add_funds))
        .route("/:user_id/funds/withdraw", post(withdraw))
        .route("/:user_id/funds/summary", get(funds_summary))
        .route("/:user_id/wallet", get(get_wallet))
}

pub async fn register(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Wallet>, AppError> {
    info!("POST /api/users/{}/register - Registering wallet", user_id);

    let wallet = state.engine.register_user(user_id).await?;
    Ok(Json(wallet))
}

pub async fn add_funds(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AddFundsRequest>,
) -> Result<Json<Wallet>, AppError> {
    info!("POST /api/users/{}/funds/add - Adding funds", user_id);

    let wallet = state.engine.add_funds(user_id, req).await.map_err(|e| {
        error!("Failed to add funds for {}: {}", user_id, e);
        e
    })?;

    Ok(Json(wallet))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<Wallet>, AppError> {
    info!("POST /api/users/{}/funds/withdraw - Withdrawing funds", user_id);

    let wallet = state.engine.withdraw(user_id, req).await.map_err(|e| {
        error!("Failed to withdraw for {}: {}", user_id, e);
        e
    })?;

    Ok(Json(wallet))
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Wallet>, AppError> {
    info!("GET /api/users/{}/wallet - Fetching wallet", user_id);

    let wallet = state.engine.get_wallet(user_id).await?;
    Ok(Json(wallet))
}

pub async fn funds_summary(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FundsSummary>, AppError> {
    info!("GET /api/users/{}/funds/summary - Funds summary", user_id);

    let summary = state.engine.funds_summary(user_id).await?;
    Ok(Json(summary))
}
