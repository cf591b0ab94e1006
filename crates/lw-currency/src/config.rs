//! Configuration for currency settlement.

use serde::{Deserialize, Serialize};

use crate::rates::ExchangeRates;

/// How a buyer's purse is rebuilt after paying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Settlement {
    /// Debit the highest denomination and borrow downward.
    #[default]
    Smooth,
    /// Collapse the purse into the highest denomination, then subtract.
    Convert,
}

/// Currency settings shared by loot and trade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Settlement policy for purchases.
    pub settlement: Settlement,
    /// Conversion table.
    pub rates: ExchangeRates,
}

impl CurrencyConfig {
    /// Set the settlement policy.
    pub fn with_settlement(mut self, settlement: Settlement) -> Self {
        self.settlement = settlement;
        self
    }

    /// Set the exchange rates.
    pub fn with_rates(mut self, rates: ExchangeRates) -> Self {
        self.rates = rates;
        self
    }
}
