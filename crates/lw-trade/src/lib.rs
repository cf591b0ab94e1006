//! Transactions between actors.
//!
//! [`TradeHelper`] resolves a [`TransactionRequest`] atomically: every item
//! and the buyer's funds are checked before anything moves, so a failed
//! trade leaves both actors untouched. Completed trades are recorded in a
//! [`TradeLog`].

pub mod config;
pub mod error;
pub mod helper;
pub mod log;
pub mod request;

pub use config::TradeConfig;
pub use error::{TradeError, TradeResult};
pub use helper::{CoinDistribution, TradeHelper, TradeOutcome};
pub use log::{TradeLog, TradeLogEntry};
pub use request::{TransactionItem, TransactionKind, TransactionRequest};
