//! Error types for trades.

use lw_core::{CoreError, ItemId};
use lw_currency::CurrencyError;

/// Alias for `Result<T, TradeError>`.
pub type TradeResult<T> = Result<T, TradeError>;

/// Reasons a transaction is refused. Nothing is moved when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// The buyer cannot cover the price.
    #[error("{buyer} cannot afford {cost} gp")]
    InsufficientFunds {
        /// Name of the paying actor.
        buyer: String,
        /// Total price in the base denomination.
        cost: f64,
    },

    /// The source does not own the item.
    #[error("{owner} does not own item {item}")]
    ItemNotOwned {
        /// Name of the source actor.
        owner: String,
        /// The requested item.
        item: ItemId,
    },

    /// More copies were requested than the source owns.
    #[error("{owner} has only {available} {name}, {requested} requested")]
    NotEnough {
        /// Name of the source actor.
        owner: String,
        /// Item name.
        name: String,
        /// Copies requested.
        requested: u32,
        /// Copies owned.
        available: u32,
    },

    /// A line of the request asked for zero copies.
    #[error("cannot trade zero copies of item {0}")]
    ZeroQuantity(ItemId),

    /// Source and destination are the same actor.
    #[error("an actor cannot trade with itself")]
    SameActor,

    /// Coins cannot be distributed to nobody.
    #[error("no one to share the coins with")]
    NoRecipients,

    /// A record store operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A currency operation failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}
