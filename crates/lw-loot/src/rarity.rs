//! Random rarity and price for documents folded into loot.

use lw_core::Rarity;

/// A rarity band with its price range in gold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityTier {
    /// The rarity.
    pub rarity: Rarity,
    /// Lowest price.
    pub min_price: u32,
    /// Highest price.
    pub max_price: u32,
    /// Highest d100 roll that lands in this band.
    pub cumulative: u32,
}

impl RarityTier {
    /// Dice formula for a price in `[min_price, max_price]`.
    pub fn price_formula(&self) -> String {
        format!(
            "{} + 1d{} - 1",
            self.min_price,
            self.max_price - self.min_price + 1
        )
    }
}

/// Rarity bands in ascending cumulative order.
pub static RARITY_TIERS: [RarityTier; 5] = [
    RarityTier {
        rarity: Rarity::Common,
        min_price: 50,
        max_price: 100,
        cumulative: 50,
    },
    RarityTier {
        rarity: Rarity::Uncommon,
        min_price: 101,
        max_price: 500,
        cumulative: 80,
    },
    RarityTier {
        rarity: Rarity::Rare,
        min_price: 501,
        max_price: 5_000,
        cumulative: 95,
    },
    RarityTier {
        rarity: Rarity::VeryRare,
        min_price: 5_001,
        max_price: 50_000,
        cumulative: 99,
    },
    RarityTier {
        rarity: Rarity::Legendary,
        min_price: 50_001,
        max_price: 100_000,
        cumulative: 100,
    },
];

/// The first tier whose cumulative percentile is at least `roll` (1-100).
pub fn get_random_rarity(roll: u32) -> &'static RarityTier {
    RARITY_TIERS
        .iter()
        .find(|tier| tier.cumulative >= roll)
        .unwrap_or(&RARITY_TIERS[RARITY_TIERS.len() - 1])
}

/// Rarity of a spell scroll by spell level.
pub fn scroll_rarity(level: u32) -> Rarity {
    match level {
        0 | 1 => Rarity::Common,
        2 | 3 => Rarity::Uncommon,
        4 | 5 => Rarity::Rare,
        6..=8 => Rarity::VeryRare,
        _ => Rarity::Legendary,
    }
}
