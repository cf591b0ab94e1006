//! Error types for currency operations.

use lw_core::Denomination;

/// Alias for `Result<T, CurrencyError>`.
pub type CurrencyResult<T> = Result<T, CurrencyError>;

/// Errors raised by the currency engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurrencyError {
    /// Coins cannot be split between zero parties.
    #[error("cannot split currency {0} ways")]
    InvalidSplit(u32),

    /// A conversion ratio with a zero numerator or denominator.
    #[error("invalid exchange rate for {0}: ratio must be non-zero")]
    InvalidRate(Denomination),

    /// The configured base denomination is not worth exactly one base unit.
    #[error("base denomination {0} must have a 1/1 ratio")]
    InvalidBase(Denomination),
}
