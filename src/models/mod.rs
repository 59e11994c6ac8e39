mod holding;
mod ledger_entry;
mod requests;
mod responses;
mod valuation;
mod wallet;

pub use holding::Holding;
pub use ledger_entry::{EntryType, LedgerEntry};
pub use requests::{AddFundsRequest, BuyRequest, SellRequest, TradeOrder, WithdrawRequest};
pub use responses::{FundsSummary, TradeOutcome};
pub use valuation::{HoldingValuation, PortfolioValuation};
pub use wallet::Wallet;
