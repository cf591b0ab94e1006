//! Configuration for trades.

use serde::{Deserialize, Serialize};

use lw_currency::CurrencyConfig;

/// Trade settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// Multiplier on list price when a merchant sells to a character.
    pub price_modifier: f64,
    /// Multiplier on list price when a character sells to a merchant.
    pub sell_modifier: f64,
    /// Currency settlement and rates.
    pub currency: CurrencyConfig,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            price_modifier: 1.0,
            sell_modifier: 0.5,
            currency: CurrencyConfig::default(),
        }
    }
}

impl TradeConfig {
    /// Set the buy price modifier (never negative).
    pub fn with_price_modifier(mut self, modifier: f64) -> Self {
        self.price_modifier = modifier.max(0.0);
        self
    }

    /// Set the sell price modifier (never negative).
    pub fn with_sell_modifier(mut self, modifier: f64) -> Self {
        self.sell_modifier = modifier.max(0.0);
        self
    }

    /// Set the currency configuration.
    pub fn with_currency(mut self, currency: CurrencyConfig) -> Self {
        self.currency = currency;
        self
    }
}
