pub mod engine;
pub mod locks;
pub mod quotes;
pub mod symbols;
pub mod valuation;
