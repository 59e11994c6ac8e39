use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{funds, health, portfolio, prices, trades};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest(
            "/api/users",
            funds::router()
                .merge(trades::router())
                .merge(portfolio::router()),
        )
        .nest("/api/prices", prices::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
