//! Currency handling for Lootwright.
//!
//! The [`CurrencyEngine`] turns currency formulas such as
//! `"1d4[gp], 1d20[sp]"` into [`CurrencyAmount`](lw_core::CurrencyAmount)s,
//! breaks scalar amounts down across the denomination chain, splits purses
//! between observers, and settles buyer/seller fund transfers.
//!
//! All conversions go through [`ExchangeRates`], which stores each
//! denomination as an exact fraction of the base unit so that remainders
//! never depend on floating-point modulo.

pub mod config;
pub mod engine;
pub mod error;
pub mod rates;

pub use config::{CurrencyConfig, Settlement};
pub use engine::{CurrencyEngine, round5};
pub use error::{CurrencyError, CurrencyResult};
pub use rates::{ExchangeRates, Ratio};
