use serde::{Deserialize, Serialize};

use crate::table::{DocumentKind, EntryPayload, TableEntry};

/// What kind of entry produced a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawResultKind {
    /// Free text.
    Text,
    /// A world document.
    Document {
        /// Document kind.
        kind: DocumentKind,
        /// Document id.
        id: String,
    },
    /// A catalog entry.
    Compendium {
        /// Catalog id.
        collection: String,
        /// Entry id.
        id: String,
    },
}

/// A single entry drawn from a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    /// Entry text or document name.
    pub text: String,
    /// Image carried over from the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Payload kind.
    #[serde(flatten)]
    pub kind: DrawResultKind,
    /// Id of the table the entry came from.
    pub table: String,
    /// Nesting depth of that table in the current roll.
    pub depth: usize,
}

impl DrawResult {
    /// Build a result from a table entry.
    pub fn from_entry(table: &str, entry: &TableEntry, depth: usize) -> Self {
        let kind = match &entry.payload {
            EntryPayload::Text { .. } => DrawResultKind::Text,
            EntryPayload::Document { kind, id, .. } => DrawResultKind::Document {
                kind: *kind,
                id: id.clone(),
            },
            EntryPayload::Compendium { collection, id, .. } => DrawResultKind::Compendium {
                collection: collection.clone(),
                id: id.clone(),
            },
        };
        Self {
            text: entry.payload.text().to_string(),
            img: entry.img.clone(),
            kind,
            table: table.to_string(),
            depth,
        }
    }

    /// A text result not tied to any table.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            img: None,
            kind: DrawResultKind::Text,
            table: String::new(),
            depth: 0,
        }
    }
}
