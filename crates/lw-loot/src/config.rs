//! Configuration for loot generation.

use serde::{Deserialize, Serialize};

use lw_currency::CurrencyConfig;

/// Default price in gold of a spell scroll, indexed by spell level (0-9).
pub const DEFAULT_SCROLL_PRICES: [f64; 10] = [
    10.0, 25.0, 100.0, 250.0, 500.0, 2_500.0, 5_000.0, 15_000.0, 25_000.0, 50_000.0,
];

/// Settings for populating actors with loot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Table rolled when the caller names none.
    pub loot_table: Option<String>,
    /// How many times to roll the loot table.
    pub draw_formula: String,
    /// Extra coins added to every populated actor, e.g. `"1d10[gp]"`.
    pub currency_formula: Option<String>,
    /// Multiplier applied to each materialized item's quantity.
    pub item_qty_formula: String,
    /// Ceiling on a stack's quantity. A roll of zero or less means no ceiling.
    pub item_qty_limit_formula: Option<String>,
    /// Catalog searched when an item is not found in its own collection.
    pub fallback_catalog: Option<String>,
    /// Remove every owned item before adding loot.
    pub clear_inventory: bool,
    /// Whether rolled coins are added to the actor.
    pub include_currency: bool,
    /// Currency settlement and rates.
    pub currency: CurrencyConfig,
    /// Spell scroll price per spell level.
    pub scroll_prices: Vec<f64>,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            loot_table: None,
            draw_formula: "1".to_string(),
            currency_formula: None,
            item_qty_formula: "1".to_string(),
            item_qty_limit_formula: None,
            fallback_catalog: None,
            clear_inventory: false,
            include_currency: true,
            currency: CurrencyConfig::default(),
            scroll_prices: DEFAULT_SCROLL_PRICES.to_vec(),
        }
    }
}

impl LootConfig {
    /// Set the default loot table.
    pub fn with_loot_table(mut self, table: impl Into<String>) -> Self {
        self.loot_table = Some(table.into());
        self
    }

    /// Set the draw-count formula.
    pub fn with_draw_formula(mut self, formula: impl Into<String>) -> Self {
        self.draw_formula = formula.into();
        self
    }

    /// Set the extra currency formula.
    pub fn with_currency_formula(mut self, formula: impl Into<String>) -> Self {
        self.currency_formula = Some(formula.into());
        self
    }

    /// Set the item quantity multiplier formula.
    pub fn with_item_qty_formula(mut self, formula: impl Into<String>) -> Self {
        self.item_qty_formula = formula.into();
        self
    }

    /// Set the stack ceiling formula.
    pub fn with_item_qty_limit_formula(mut self, formula: impl Into<String>) -> Self {
        self.item_qty_limit_formula = Some(formula.into());
        self
    }

    /// Set the fallback catalog.
    pub fn with_fallback_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.fallback_catalog = Some(catalog.into());
        self
    }

    /// Clear inventories before populating.
    pub fn with_clear_inventory(mut self, clear: bool) -> Self {
        self.clear_inventory = clear;
        self
    }

    /// Toggle currency generation.
    pub fn with_include_currency(mut self, include: bool) -> Self {
        self.include_currency = include;
        self
    }

    /// Set the currency configuration.
    pub fn with_currency(mut self, currency: CurrencyConfig) -> Self {
        self.currency = currency;
        self
    }

    /// Price of a scroll of the given spell level.
    ///
    /// Levels past the end of the table use the last price.
    pub fn scroll_price(&self, level: u32) -> f64 {
        let index = usize::try_from(level).unwrap_or(usize::MAX);
        self.scroll_prices
            .get(index)
            .or_else(|| self.scroll_prices.last())
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lw_currency::Settlement;

    #[test]
    fn default_config() {
        let cfg = LootConfig::default();
        assert_eq!(cfg.draw_formula, "1");
        assert_eq!(cfg.item_qty_formula, "1");
        assert!(cfg.include_currency);
        assert!(!cfg.clear_inventory);
        assert_eq!(cfg.scroll_prices.len(), 10);
    }

    #[test]
    fn builder_methods() {
        let cfg = LootConfig::default()
            .with_loot_table("goblin-loot")
            .with_draw_formula("1d3")
            .with_item_qty_limit_formula("10")
            .with_clear_inventory(true);
        assert_eq!(cfg.loot_table.as_deref(), Some("goblin-loot"));
        assert_eq!(cfg.draw_formula, "1d3");
        assert_eq!(cfg.item_qty_limit_formula.as_deref(), Some("10"));
        assert!(cfg.clear_inventory);
    }

    #[test]
    fn scroll_price_clamps_to_last() {
        let cfg = LootConfig::default();
        assert_eq!(cfg.scroll_price(0), 10.0);
        assert_eq!(cfg.scroll_price(3), 250.0);
        assert_eq!(cfg.scroll_price(42), 50_000.0);
    }

    #[test]
    fn deserialize_partial() {
        let cfg: LootConfig = serde_json::from_str(
            r#"{"draw_formula": "2", "currency": {"settlement": "convert"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.draw_formula, "2");
        assert_eq!(cfg.currency.settlement, Settlement::Convert);
        assert_eq!(cfg.item_qty_formula, "1");
    }
}
