//! Error types for loot generation.

use lw_core::CoreError;
use lw_currency::CurrencyError;

use crate::roller::MAX_DEPTH;

/// Alias for `Result<T, LootError>`.
pub type LootResult<T> = Result<T, LootError>;

/// Errors that abort a loot operation.
///
/// Configuration problems inside a roll (a table without a formula, an
/// unknown item) are reported to the notifier instead and do not appear here.
#[derive(Debug, thiserror::Error)]
pub enum LootError {
    /// Nested tables went deeper than [`MAX_DEPTH`].
    #[error("table \"{table}\" nested deeper than {} levels", MAX_DEPTH)]
    DepthExceeded {
        /// The table whose roll would have exceeded the limit.
        table: String,
    },

    /// A table requested by the caller does not exist.
    #[error("table not found: \"{0}\"")]
    TableNotFound(String),

    /// A record store operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The currency configuration is invalid.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// A text pattern failed to compile.
    #[error("invalid text pattern: {0}")]
    Pattern(#[from] regex::Error),
}
