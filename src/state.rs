use std::sync::Arc;

use crate::services::engine::PortfolioEngine;
use crate::services::quotes::QuoteService;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PortfolioEngine>,
    pub quotes: Arc<QuoteService>,
}
