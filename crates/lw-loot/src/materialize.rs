//! Writing item drafts into an actor's inventory.

use std::fmt;

use serde::{Deserialize, Serialize};

use lw_core::{
    ActorId, Catalogs, FormulaContext, Item, ItemId, ItemKind, MetadataValue, Notifier, Rarity,
    RecordStore,
};
use lw_dice::Roller;

use crate::config::LootConfig;
use crate::error::LootResult;
use crate::parse::Command;
use crate::processor::ItemDraft;
use crate::rarity::scroll_rarity;

/// One inventory write performed by materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemChange {
    /// The written record.
    pub item: ItemId,
    /// Its name.
    pub name: String,
    /// Copies added by this write.
    pub added: u32,
    /// Stack size after the write.
    pub quantity: u32,
    /// True if the record was created rather than updated.
    pub created: bool,
}

impl fmt::Display for ItemChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} {}", self.added, self.name)?;
        if self.created {
            write!(f, " (new)")
        } else {
            write!(f, " (now {})", self.quantity)
        }
    }
}

/// Merge drafts sharing a `(name, collection)` identity, summing quantities.
pub fn merge_drafts(drafts: Vec<ItemDraft>) -> Vec<ItemDraft> {
    let mut merged: Vec<ItemDraft> = Vec::new();
    for draft in drafts {
        match merged.iter_mut().find(|d| d.identity() == draft.identity()) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(draft.quantity);
                for command in draft.commands {
                    if !existing.commands.contains(&command) {
                        existing.commands.push(command);
                    }
                }
            }
            None => merged.push(draft),
        }
    }
    merged
}

/// Resolves drafts against catalogs and writes them into inventories.
pub struct Materializer<'a> {
    store: &'a mut dyn RecordStore,
    catalogs: &'a Catalogs,
    config: &'a LootConfig,
    dice: &'a mut Roller,
    notifier: &'a mut dyn Notifier,
}

impl<'a> Materializer<'a> {
    /// Create a materializer writing into `store`.
    pub fn new(
        store: &'a mut dyn RecordStore,
        catalogs: &'a Catalogs,
        config: &'a LootConfig,
        dice: &'a mut Roller,
        notifier: &'a mut dyn Notifier,
    ) -> Self {
        Self {
            store,
            catalogs,
            config,
            dice,
            notifier,
        }
    }

    /// Add drafts to an actor's inventory.
    ///
    /// Drafts that resolve to no item definition are skipped with a warning.
    /// Existing `(name, price)` stacks grow up to the configured ceiling;
    /// anything past the ceiling is discarded.
    pub fn add_items_to_actor(
        &mut self,
        actor: ActorId,
        drafts: Vec<ItemDraft>,
    ) -> LootResult<Vec<ItemChange>> {
        let (actor_name, context) = {
            let record = self.store.actor(actor)?;
            (record.name.clone(), record.data.clone())
        };

        let mut changes = Vec::new();
        for draft in merge_drafts(drafts) {
            let Some(mut item) = self.resolve(actor, &draft)? else {
                self.notifier.warn(&format!(
                    "no item \"{}\" found for {actor_name}, skipped",
                    draft.name
                ));
                continue;
            };
            item.id = ItemId::new();

            if item.kind == ItemKind::Spell {
                item = self.to_scroll(item);
            }
            let quantity_override = self.apply_commands(&mut item, &draft.commands, &context);

            let multiplier = self.dice.roll_formula(&self.config.item_qty_formula, &context);
            let base = quantity_override.unwrap_or(draft.quantity);
            let quantity = clamp_u32(i64::from(base).saturating_mul(multiplier.max(0)));
            let ceiling = self
                .config
                .item_qty_limit_formula
                .as_deref()
                .map(|formula| self.dice.roll_formula(formula, &context))
                .filter(|limit| *limit > 0)
                .map(clamp_u32);

            if quantity == 0 {
                tracing::debug!("draft {} rolled zero copies", item.name);
                continue;
            }
            if let Some(change) = self.write(actor, item, quantity, ceiling)? {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    /// Find the definition backing a draft.
    ///
    /// Order: the draft's own collection, the fallback catalog, the world
    /// catalog, then an item the actor already owns.
    fn resolve(&mut self, actor: ActorId, draft: &ItemDraft) -> LootResult<Option<Item>> {
        if let Some(kind) = draft.kind {
            let mut item = Item::new(kind, draft.name.clone())
                .with_price(draft.price_override.unwrap_or(0.0));
            item.rarity = draft.rarity;
            return Ok(Some(item));
        }

        let source_id = draft.source_id.as_deref().and_then(ItemId::parse);
        let catalogs = self.catalogs;
        let lookup = |catalog: &str| {
            source_id
                .and_then(|id| catalogs.find_by_id(catalog, id))
                .or_else(|| catalogs.find_by_name(catalog, &draft.name))
                .map(|item| (catalog.to_string(), item))
        };

        let found = draft
            .collection
            .as_deref()
            .and_then(lookup)
            .or_else(|| self.config.fallback_catalog.as_deref().and_then(lookup))
            .or_else(|| {
                source_id
                    .and_then(|id| catalogs.world.find_by_id(id))
                    .or_else(|| catalogs.world.find_by_name(&draft.name))
                    .map(|item| ("world".to_string(), item))
            });

        if let Some((catalog, definition)) = found {
            let mut item = definition.clone();
            item.source = Some(format!("{catalog}.{}", definition.id.0));
            return Ok(Some(item));
        }

        let owned = self.store.actor(actor)?.find_item_by_name(&draft.name).cloned();
        Ok(owned)
    }

    /// Spells never enter inventories directly; they become scrolls.
    fn to_scroll(&self, spell: Item) -> Item {
        let level = spell.level.unwrap_or(0);
        let mut scroll = Item::new(ItemKind::Consumable, format!("Spell Scroll: {}", spell.name))
            .with_price(self.config.scroll_price(level))
            .with_level(level);
        scroll.rarity = Some(scroll_rarity(level));
        scroll.weight = 0.0;
        scroll.source = spell.source;
        scroll
            .properties
            .insert("spell".to_string(), MetadataValue::String(spell.name));
        scroll
    }

    /// Apply `@command` overrides. Returns the quantity override, if any.
    fn apply_commands(
        &mut self,
        item: &mut Item,
        commands: &[Command],
        context: &FormulaContext,
    ) -> Option<u32> {
        let mut quantity = None;
        for command in commands {
            match command.name.as_str() {
                "price" => item.price = self.dice.roll_formula(&command.arg, context) as f64,
                "weight" => item.weight = self.dice.roll_formula(&command.arg, context) as f64,
                "quantity" => {
                    quantity = Some(clamp_u32(self.dice.roll_formula(&command.arg, context)));
                }
                "level" => {
                    item.level = Some(clamp_u32(self.dice.roll_formula(&command.arg, context)));
                }
                "name" => item.name = command.arg.clone(),
                "rarity" => match Rarity::parse(&command.arg) {
                    Some(rarity) => item.rarity = Some(rarity),
                    None => self.notifier.warn(&format!(
                        "unknown rarity \"{}\" on {}",
                        command.arg, item.name
                    )),
                },
                other => {
                    let value = if lw_dice::parse(&command.arg).is_ok() {
                        MetadataValue::Integer(self.dice.roll_formula(&command.arg, context))
                    } else {
                        MetadataValue::String(command.arg.clone())
                    };
                    item.properties.insert(other.to_string(), value);
                }
            }
        }
        quantity
    }

    /// Merge into an existing stack or create a new record.
    fn write(
        &mut self,
        actor: ActorId,
        mut item: Item,
        quantity: u32,
        ceiling: Option<u32>,
    ) -> LootResult<Option<ItemChange>> {
        let existing = self
            .store
            .actor(actor)?
            .find_stack(&item.name, item.price)
            .cloned();

        match existing {
            Some(mut stack) => {
                let wanted = stack.quantity.saturating_add(quantity);
                let capped = ceiling.map_or(wanted, |limit| wanted.min(limit.max(stack.quantity)));
                let added = capped - stack.quantity;
                if added == 0 {
                    tracing::debug!("{} already at its quantity ceiling", stack.name);
                    return Ok(None);
                }
                stack.quantity = capped;
                let change = ItemChange {
                    item: stack.id,
                    name: stack.name.clone(),
                    added,
                    quantity: capped,
                    created: false,
                };
                self.store.update_item(actor, stack)?;
                Ok(Some(change))
            }
            None => {
                item.quantity = ceiling.map_or(quantity, |limit| quantity.min(limit));
                let change = ItemChange {
                    item: item.id,
                    name: item.name.clone(),
                    added: item.quantity,
                    quantity: item.quantity,
                    created: true,
                };
                self.store.create_item(actor, item)?;
                Ok(Some(change))
            }
        }
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
