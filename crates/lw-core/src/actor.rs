use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::CurrencyAmount;
use crate::item::Item;
use crate::metadata::FormulaContext;

/// Unique identifier for every actor in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Generate a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// What role an actor plays in loot and trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A non-player character that can carry generated loot.
    #[default]
    Npc,
    /// A player character.
    Character,
    /// A shopkeeper that buys and sells.
    Merchant,
    /// A loot pile shared among observers.
    Loot,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npc => write!(f, "npc"),
            Self::Character => write!(f, "character"),
            Self::Merchant => write!(f, "merchant"),
            Self::Loot => write!(f, "loot"),
        }
    }
}

/// An actor record: coins, inventory, and the data formulas can reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier for this actor.
    #[serde(default)]
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// The actor's role.
    #[serde(default)]
    pub kind: ActorKind,
    /// Coins carried.
    #[serde(default)]
    pub currency: CurrencyAmount,
    /// Attributes available to dice formulas as `@path`.
    #[serde(default)]
    pub data: FormulaContext,
    /// Owned items.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Actor {
    /// Create an empty actor with a random ID.
    pub fn new(kind: ActorKind, name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            kind,
            currency: CurrencyAmount::default(),
            data: FormulaContext::new(),
            items: Vec::new(),
        }
    }

    /// Set the starting coins.
    pub fn with_currency(mut self, currency: CurrencyAmount) -> Self {
        self.currency = currency;
        self
    }

    /// Add an owned item.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Find an owned item stacking with `(name, price)`.
    pub fn find_stack(&self, name: &str, price: f64) -> Option<&Item> {
        self.items.iter().find(|i| i.stacks_with(name, price))
    }

    /// Find an owned item by name (case-insensitive).
    pub fn find_item_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }
}
