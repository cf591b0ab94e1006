//! Transaction requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use lw_core::{ActorId, ItemId};

/// What kind of exchange a request describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// The destination buys from the source.
    Buy,
    /// The source sells to the destination.
    Sell,
    /// The destination takes items from a loot pile. Free.
    Loot,
    /// The source hands items to the destination. Free.
    Give,
}

impl TransactionKind {
    /// Whether coins change hands.
    pub fn is_paid(self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
            Self::Loot => write!(f, "loot"),
            Self::Give => write!(f, "give"),
        }
    }
}

/// One line of a request: an item owned by the source and how many to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionItem {
    /// The source's item.
    pub item: ItemId,
    /// Number of copies.
    pub quantity: u32,
}

impl TransactionItem {
    /// Create a request line.
    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

/// Items always flow from `source` to `destination`; who pays depends on
/// `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// The actor giving up the items.
    pub source: ActorId,
    /// The actor receiving the items.
    pub destination: ActorId,
    /// Kind of exchange.
    pub kind: TransactionKind,
    /// Items to move.
    pub items: Vec<TransactionItem>,
    /// Overrides the configured modifier for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<f64>,
}

impl TransactionRequest {
    /// Create a request with no items.
    pub fn new(source: ActorId, destination: ActorId, kind: TransactionKind) -> Self {
        Self {
            source,
            destination,
            kind,
            items: Vec::new(),
            price_modifier: None,
        }
    }

    /// Add a request line.
    pub fn with_item(mut self, item: ItemId, quantity: u32) -> Self {
        self.items.push(TransactionItem::new(item, quantity));
        self
    }

    /// Override the price modifier.
    pub fn with_price_modifier(mut self, modifier: f64) -> Self {
        self.price_modifier = Some(modifier);
        self
    }
}
