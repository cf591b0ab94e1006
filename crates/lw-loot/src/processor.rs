//! Turns raw draws into item drafts and coins.

use serde::{Deserialize, Serialize};

use lw_core::{CurrencyAmount, ItemKind, Rarity};
use lw_currency::CurrencyEngine;

use crate::draw::{DrawResult, DrawResultKind};
use crate::error::LootResult;
use crate::ledger::table_key;
use crate::library::TableRef;
use crate::parse::{Command, TextPatterns};
use crate::rarity::get_random_rarity;
use crate::roller::TableRoller;
use crate::table::DocumentKind;

/// An item waiting to be written into an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Display name.
    pub name: String,
    /// Catalog the item should come from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Id of the backing definition, when the draw named one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Overrides applied on materialization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    /// Copies drafted.
    pub quantity: u32,
    /// Fixed price for items with no catalog definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_override: Option<f64>,
    /// Set for items built from scratch instead of looked up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,
    /// Rarity of an item built from scratch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
}

impl ItemDraft {
    /// A single copy of `name` with nothing else resolved.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
            source_id: None,
            commands: Vec::new(),
            quantity: 1,
            price_override: None,
            kind: None,
            rarity: None,
        }
    }

    /// Set the collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Add an override.
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Identity used to merge duplicate drafts.
    pub fn identity(&self) -> (String, Option<String>) {
        (self.name.to_lowercase(), self.collection.clone())
    }
}

/// Items and coins produced by one set of draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootBundle {
    /// Item drafts, in draw order.
    pub items: Vec<ItemDraft>,
    /// Coins from currency tags.
    pub currency: CurrencyAmount,
}

/// Processes draw results, recursing into tables named in text.
pub struct LootProcessor<'a> {
    tables: TableRoller<'a>,
    patterns: &'a TextPatterns,
    currency: &'a CurrencyEngine,
}

impl<'a> LootProcessor<'a> {
    /// Create a processor. Nested table rolls go through `tables`.
    pub fn new(
        tables: TableRoller<'a>,
        patterns: &'a TextPatterns,
        currency: &'a CurrencyEngine,
    ) -> Self {
        Self {
            tables,
            patterns,
            currency,
        }
    }

    /// The table roller, for the initial draw.
    pub fn tables(&mut self) -> &mut TableRoller<'a> {
        &mut self.tables
    }

    /// Convert draws into item drafts and accumulated coins.
    pub fn build_results(&mut self, draws: Vec<DrawResult>) -> LootResult<LootBundle> {
        let mut bundle = LootBundle::default();
        for draw in draws {
            self.process_draw(draw, &mut bundle)?;
        }
        Ok(bundle)
    }

    fn process_draw(&mut self, draw: DrawResult, bundle: &mut LootBundle) -> LootResult<()> {
        match draw.kind {
            DrawResultKind::Text => {
                let patterns = self.patterns;
                for alternative in patterns.split_alternatives(&draw.text) {
                    self.process_text(alternative, draw.depth, bundle)?;
                }
            }
            DrawResultKind::Document { kind, id } => match kind {
                DocumentKind::Item => bundle.items.push(ItemDraft {
                    source_id: Some(id),
                    ..ItemDraft::named(draw.text)
                }),
                DocumentKind::Actor => {
                    let draft = self.priced_document(format!("Portrait of {}", draw.text));
                    bundle.items.push(draft);
                }
                DocumentKind::Scene => {
                    let draft = self.priced_document(format!("Map of {}", draw.text));
                    bundle.items.push(draft);
                }
                DocumentKind::Table => {
                    tracing::debug!("table document {id} reached the processor, ignored");
                }
            },
            DrawResultKind::Compendium { collection, id } => bundle.items.push(ItemDraft {
                collection: Some(collection),
                source_id: Some(id),
                ..ItemDraft::named(draw.text)
            }),
        }
        Ok(())
    }

    fn process_text(
        &mut self,
        alternative: &str,
        depth: usize,
        bundle: &mut LootBundle,
    ) -> LootResult<()> {
        let patterns = self.patterns;
        let tables = &mut self.tables;

        let (text, formulas) = patterns.extract_currency(alternative);
        for formula in formulas {
            let coins =
                self.currency
                    .generate_currency(&formula, tables.dice, tables.notifier, tables.context);
            bundle.currency.merge(&coins);
        }

        let text = patterns.expand_inline_rolls(&text, tables.dice, tables.context);
        let token = patterns.tokenize(&text);

        let Some(raw_table) = token.table else {
            if token.text.is_empty() {
                tracing::debug!("text result {alternative:?} yielded no item");
            } else {
                bundle.items.push(ItemDraft {
                    collection: token.collection,
                    commands: token.commands,
                    ..ItemDraft::named(token.text)
                });
            }
            return Ok(());
        };

        let library = tables.library;
        let reference = TableRef::parse(&raw_table, library);
        let Some(inner) = library.resolve(&reference) else {
            tables
                .notifier
                .error(&format!("loot text references unknown table \"{raw_table}\""));
            return Ok(());
        };

        let count = if token.text.is_empty() {
            1
        } else {
            tables.dice.roll_formula(&token.text, tables.context).max(0)
        };
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let key = table_key(reference.collection.as_deref(), &inner.id);
        let draws = tables.roll_at(inner, &key, count, depth + 1)?;
        for draw in draws {
            self.process_draw(draw, bundle)?;
        }
        Ok(())
    }

    /// Draft a portrait or map with a random rarity and price.
    fn priced_document(&mut self, name: String) -> ItemDraft {
        let tables = &mut self.tables;
        let tier = get_random_rarity(tables.dice.random_range(1..=100));
        let price = tables.dice.roll_formula(&tier.price_formula(), tables.context);
        ItemDraft {
            price_override: Some(price as f64),
            kind: Some(ItemKind::Loot),
            rarity: Some(tier.rarity),
            ..ItemDraft::named(name)
        }
    }
}
