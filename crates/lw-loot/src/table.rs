//! Roll tables and their entries.

use serde::{Deserialize, Serialize};

/// What a document entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A world item.
    Item,
    /// An actor; drawn as a portrait.
    Actor,
    /// A scene; drawn as a map.
    Scene,
    /// Another roll table.
    Table,
}

/// The content of a table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryPayload {
    /// Free text, parsed by the loot processor.
    Text {
        /// The raw text.
        text: String,
    },
    /// A reference to a world document.
    Document {
        /// Document kind.
        kind: DocumentKind,
        /// Document id.
        id: String,
        /// Display name.
        name: String,
    },
    /// A reference into a named catalog.
    Compendium {
        /// Catalog (or table pack) id.
        collection: String,
        /// Entry id inside the collection.
        id: String,
        /// Display name.
        name: String,
    },
}

impl EntryPayload {
    /// The display text of the entry.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Document { name, .. } | Self::Compendium { name, .. } => name,
        }
    }
}

/// One row of a roll table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Relative draw weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Inclusive roll range. Derived from weights when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[u32; 2]>,
    /// Copies contributed per draw. Defaults to `"1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Optional image path carried through to draw results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// What the entry yields.
    #[serde(flatten)]
    pub payload: EntryPayload,
}

fn default_weight() -> u32 {
    1
}

impl TableEntry {
    /// A weight-1 text entry.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_payload(EntryPayload::Text { text: text.into() })
    }

    /// A weight-1 entry with any payload.
    pub fn with_payload(payload: EntryPayload) -> Self {
        Self {
            weight: 1,
            range: None,
            quantity: None,
            img: None,
            payload,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the quantity formula.
    pub fn with_quantity(mut self, formula: impl Into<String>) -> Self {
        self.quantity = Some(formula.into());
        self
    }

    /// Set an explicit roll range.
    pub fn with_range(mut self, low: u32, high: u32) -> Self {
        self.range = Some([low, high]);
        self
    }
}

/// A weighted table of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollTable {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Roll formula used to pick entries, e.g. `"1d20"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Whether an entry can be drawn again before the table is exhausted.
    #[serde(default = "default_replacement")]
    pub replacement: bool,
    /// The rows.
    #[serde(default)]
    pub entries: Vec<TableEntry>,
}

fn default_replacement() -> bool {
    true
}

impl RollTable {
    /// An empty table with replacement and no formula.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formula: None,
            replacement: true,
            entries: Vec::new(),
        }
    }

    /// Set the roll formula.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Set replacement mode.
    pub fn with_replacement(mut self, replacement: bool) -> Self {
        self.replacement = replacement;
        self
    }

    /// Append an entry.
    pub fn with_entry(mut self, entry: TableEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Sum of all entry weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.weight)).sum()
    }

    /// The inclusive range of entry `index`.
    ///
    /// Explicit ranges win; otherwise ranges are laid out by cumulative
    /// weight starting at 1. Zero-weight entries without a range match nothing.
    pub fn entry_range(&self, index: usize) -> Option<(u64, u64)> {
        let entry = self.entries.get(index)?;
        if let Some([low, high]) = entry.range {
            return Some((u64::from(low), u64::from(high)));
        }
        if entry.weight == 0 {
            return None;
        }
        let start: u64 = self.entries[..index]
            .iter()
            .map(|e| u64::from(e.weight))
            .sum::<u64>()
            + 1;
        Some((start, start + u64::from(entry.weight) - 1))
    }

    /// Index of the entry whose range contains `roll`.
    pub fn entry_for_roll(&self, roll: i64) -> Option<usize> {
        let roll = u64::try_from(roll).ok()?;
        (0..self.entries.len()).find(|&i| {
            self.entry_range(i)
                .is_some_and(|(low, high)| (low..=high).contains(&roll))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RollTable {
        RollTable::new("t", "Trinkets")
            .with_formula("1d6")
            .with_entry(TableEntry::text("Torch").with_weight(3))
            .with_entry(TableEntry::text("Rope").with_weight(2))
            .with_entry(TableEntry::text("Chalk"))
    }

    #[test]
    fn derived_ranges() {
        let table = sample();
        assert_eq!(table.total_weight(), 6);
        assert_eq!(table.entry_range(0), Some((1, 3)));
        assert_eq!(table.entry_range(1), Some((4, 5)));
        assert_eq!(table.entry_range(2), Some((6, 6)));
        assert_eq!(table.entry_for_roll(4), Some(1));
        assert_eq!(table.entry_for_roll(7), None);
        assert_eq!(table.entry_for_roll(-1), None);
    }

    #[test]
    fn explicit_range_wins() {
        let table = RollTable::new("t", "T")
            .with_entry(TableEntry::text("Low").with_range(1, 10))
            .with_entry(TableEntry::text("High").with_range(11, 20));
        assert_eq!(table.entry_for_roll(15), Some(1));
    }

    #[test]
    fn deserialize_payloads() {
        let table: RollTable = serde_json::from_str(
            r#"{
                "id": "hoard", "name": "Hoard", "formula": "1d3", "replacement": false,
                "entries": [
                    {"type": "text", "text": "{2d6[gp]}"},
                    {"type": "document", "kind": "table", "id": "gems", "name": "Gems", "quantity": "1d2"},
                    {"type": "compendium", "collection": "srd-items", "id": "abc", "name": "Rope", "weight": 4}
                ]
            }"#,
        )
        .unwrap();
        assert!(!table.replacement);
        assert_eq!(table.entries.len(), 3);
        assert_eq!(table.entries[1].quantity.as_deref(), Some("1d2"));
        assert_eq!(table.entries[2].weight, 4);
        assert_eq!(table.entries[2].payload.text(), "Rope");
        assert!(matches!(
            table.entries[1].payload,
            EntryPayload::Document {
                kind: DocumentKind::Table,
                ..
            }
        ));
    }
}
