use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metadata::MetadataValue;

/// Unique identifier for an item definition or owned item record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Generate a new random item ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from its UUID text form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The broad category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Swords, bows, and other weapons.
    Weapon,
    /// Armor, clothing, and wearable gear.
    Equipment,
    /// Potions, scrolls, ammunition, and other single-use items.
    Consumable,
    /// Tools and kits.
    Tool,
    /// Bags, chests, and other containers.
    Container,
    /// A spell. Spells never appear in loot directly; they become scrolls.
    Spell,
    /// Treasure, trinkets, and anything else.
    #[default]
    Loot,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Equipment => write!(f, "equipment"),
            Self::Consumable => write!(f, "consumable"),
            Self::Tool => write!(f, "tool"),
            Self::Container => write!(f, "container"),
            Self::Spell => write!(f, "spell"),
            Self::Loot => write!(f, "loot"),
        }
    }
}

/// Item rarity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Common.
    Common,
    /// Uncommon.
    Uncommon,
    /// Rare.
    Rare,
    /// Very rare.
    VeryRare,
    /// Legendary.
    Legendary,
    /// Artifact.
    Artifact,
}

impl Rarity {
    /// Parse a rarity name such as `"very rare"` or `"veryRare"`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "rare" => Some(Self::Rare),
            "veryrare" => Some(Self::VeryRare),
            "legendary" => Some(Self::Legendary),
            "artifact" => Some(Self::Artifact),
            _ => None,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Uncommon => write!(f, "uncommon"),
            Self::Rare => write!(f, "rare"),
            Self::VeryRare => write!(f, "very rare"),
            Self::Legendary => write!(f, "legendary"),
            Self::Artifact => write!(f, "artifact"),
        }
    }
}

/// An item: either a catalog definition or a record owned by an actor.
///
/// Prices are expressed in the base denomination (gold pieces).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier for this item.
    #[serde(default)]
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Item category.
    #[serde(default)]
    pub kind: ItemKind,
    /// Unit price in gold pieces.
    #[serde(default)]
    pub price: f64,
    /// Unit weight.
    #[serde(default)]
    pub weight: f64,
    /// Stack size.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Rarity, if the item has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    /// Spell level, for spells and scrolls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Where this item was copied from (`"<catalog>.<id>"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Free-form properties set by `@command` overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, MetadataValue>,
}

fn default_quantity() -> u32 {
    1
}

impl Item {
    /// Create a new item with a random ID, quantity 1, and no price.
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            price: 0.0,
            weight: 0.0,
            quantity: 1,
            rarity: None,
            level: None,
            source: None,
            properties: HashMap::new(),
        }
    }

    /// Set the unit price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the stack size.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the spell level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// True if `other` counts as the same stack: same name (case-insensitive)
    /// and same unit price.
    pub fn stacks_with(&self, name: &str, price: f64) -> bool {
        self.name.eq_ignore_ascii_case(name) && (self.price - price).abs() < 1e-9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_display_shows_short_form() {
        let id = ItemId::parse("a3f2b1c8-1234-5678-9abc-def012345678").unwrap();
        assert_eq!(id.to_string(), "a3f2b1c8");
        assert!(ItemId::parse("not-a-uuid").is_none());
    }

    #[test]
    fn rarity_parse_variants() {
        assert_eq!(Rarity::parse("very rare"), Some(Rarity::VeryRare));
        assert_eq!(Rarity::parse("veryRare"), Some(Rarity::VeryRare));
        assert_eq!(Rarity::parse("Legendary"), Some(Rarity::Legendary));
        assert_eq!(Rarity::parse("mythic"), None);
    }

    #[test]
    fn stacking_identity() {
        let torch = Item::new(ItemKind::Loot, "Torch").with_price(0.01);
        assert!(torch.stacks_with("torch", 0.01));
        assert!(!torch.stacks_with("Torch", 0.02));
        assert!(!torch.stacks_with("Lantern", 0.01));
    }

    #[test]
    fn deserialize_with_defaults() {
        let item: Item = serde_json::from_str(r#"{"name": "Rope", "price": 1}"#).unwrap();
        assert_eq!(item.name, "Rope");
        assert_eq!(item.kind, ItemKind::Loot);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, 1.0);
    }
}
