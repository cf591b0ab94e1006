//! End-to-end loot population for actors.

use std::fmt;

use serde::Serialize;

use lw_core::{ActorId, Catalogs, CurrencyAmount, FormulaContext, Notifier, RecordStore};
use lw_currency::CurrencyEngine;
use lw_dice::Roller;

use crate::config::LootConfig;
use crate::draw::DrawResult;
use crate::error::{LootError, LootResult};
use crate::ledger::{DrawLedger, table_key};
use crate::library::{TableLibrary, TableRef};
use crate::materialize::{ItemChange, Materializer};
use crate::parse::TextPatterns;
use crate::processor::{LootBundle, LootProcessor};
use crate::roller::{RollOptions, TableRoller};

/// Summary of one populated actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LootReport {
    /// The actor that received loot.
    pub actor: ActorId,
    /// Its name.
    pub actor_name: String,
    /// The table rolled.
    pub table: String,
    /// Number of top-level draws requested.
    pub draws: u32,
    /// Inventory writes.
    pub changes: Vec<ItemChange>,
    /// Coins added.
    pub currency: CurrencyAmount,
    /// The actor's purse afterwards.
    pub purse: CurrencyAmount,
}

impl fmt::Display for LootReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} draw(s) from \"{}\"",
            self.actor_name, self.draws, self.table
        )?;
        if self.changes.is_empty() {
            writeln!(f, "  no items")?;
        }
        for change in &self.changes {
            writeln!(f, "  {change}")?;
        }
        if !self.currency.is_empty() {
            writeln!(f, "  coins: +{} (purse {})", self.currency, self.purse)?;
        }
        Ok(())
    }
}

/// Owns the tables, catalogs, and random state needed to populate actors.
#[derive(Debug)]
pub struct LootGenerator {
    config: LootConfig,
    library: TableLibrary,
    catalogs: Catalogs,
    currency: CurrencyEngine,
    patterns: TextPatterns,
    ledger: DrawLedger,
    dice: Roller,
}

impl LootGenerator {
    /// Build a generator. Fails if the currency rates are invalid.
    pub fn new(
        config: LootConfig,
        library: TableLibrary,
        catalogs: Catalogs,
        dice: Roller,
    ) -> LootResult<Self> {
        let currency = CurrencyEngine::new(config.currency.clone())?;
        Ok(Self {
            config,
            library,
            catalogs,
            currency,
            patterns: TextPatterns::new()?,
            ledger: DrawLedger::new(),
            dice,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &LootConfig {
        &self.config
    }

    /// The table library.
    pub fn library(&self) -> &TableLibrary {
        &self.library
    }

    /// The draw ledger.
    pub fn ledger(&self) -> &DrawLedger {
        &self.ledger
    }

    /// The currency engine.
    pub fn currency(&self) -> &CurrencyEngine {
        &self.currency
    }

    /// Draw from a table by id or name.
    pub fn roll_table(
        &mut self,
        table: &str,
        options: RollOptions,
        context: &FormulaContext,
        notifier: &mut dyn Notifier,
    ) -> LootResult<Vec<DrawResult>> {
        let table = self
            .library
            .get(table)
            .ok_or_else(|| LootError::TableNotFound(table.to_string()))?;
        TableRoller::new(
            &self.library,
            &mut self.ledger,
            &mut self.dice,
            notifier,
            context,
        )
        .roll(table, options)
    }

    /// Draw from a table and process the results into drafts and coins.
    pub fn roll_loot(
        &mut self,
        table: &str,
        options: RollOptions,
        context: &FormulaContext,
        notifier: &mut dyn Notifier,
    ) -> LootResult<LootBundle> {
        let table = self
            .library
            .get(table)
            .ok_or_else(|| LootError::TableNotFound(table.to_string()))?;
        let tables = TableRoller::new(
            &self.library,
            &mut self.ledger,
            &mut self.dice,
            notifier,
            context,
        );
        let mut processor = LootProcessor::new(tables, &self.patterns, &self.currency);
        let draws = processor.tables().roll(table, options)?;
        processor.build_results(draws)
    }

    /// Populate one actor from `table`, or from the configured loot table.
    ///
    /// Items are merged into the inventory and coins into the purse.
    pub fn populate(
        &mut self,
        store: &mut dyn RecordStore,
        actor: ActorId,
        table: Option<&str>,
        notifier: &mut dyn Notifier,
    ) -> LootResult<LootReport> {
        let table_key = table
            .map(str::to_string)
            .or_else(|| self.config.loot_table.clone())
            .ok_or_else(|| LootError::TableNotFound("(no loot table configured)".to_string()))?;
        let table_name = self
            .library
            .get(&table_key)
            .map(|t| t.name.clone())
            .ok_or_else(|| LootError::TableNotFound(table_key.clone()))?;

        let (actor_name, context, items) = {
            let record = store.actor(actor)?;
            let items: Vec<_> = record.items.iter().map(|i| i.id).collect();
            (record.name.clone(), record.data.clone(), items)
        };

        let draws = u32::try_from(
            self.dice
                .roll_formula(&self.config.draw_formula, &context)
                .max(0),
        )
        .unwrap_or(u32::MAX);
        let bundle = self.roll_loot(
            &table_key,
            RollOptions::default().with_total(draws),
            &context,
            notifier,
        )?;

        // Clear only after a successful roll.
        if self.config.clear_inventory && !items.is_empty() {
            store.delete_items(actor, &items)?;
            tracing::debug!("cleared {} item(s) from {actor_name}", items.len());
        }

        let changes = Materializer::new(
            store,
            &self.catalogs,
            &self.config,
            &mut self.dice,
            notifier,
        )
        .add_items_to_actor(actor, bundle.items)?;

        let mut currency = CurrencyAmount::blank();
        if self.config.include_currency {
            currency = bundle.currency;
            if let Some(formula) = &self.config.currency_formula {
                let extra =
                    self.currency
                        .generate_currency(formula, &mut self.dice, notifier, &context);
                currency = self.currency.merge(&currency, &extra);
            }
        }

        let mut purse = self.currency.merge(&store.actor(actor)?.currency, &currency);
        self.currency.smooth(&mut purse);
        store.update_currency(actor, purse)?;

        tracing::debug!("populated {actor_name} from {table_name}");
        Ok(LootReport {
            actor,
            actor_name,
            table: table_name,
            draws,
            changes,
            currency,
            purse,
        })
    }

    /// Populate several actors, strictly one after another.
    pub fn populate_all(
        &mut self,
        store: &mut dyn RecordStore,
        actors: &[ActorId],
        table: Option<&str>,
        notifier: &mut dyn Notifier,
    ) -> LootResult<Vec<LootReport>> {
        actors
            .iter()
            .map(|&actor| self.populate(store, actor, table, notifier))
            .collect()
    }

    /// Make every entry of a no-replacement table drawable again.
    ///
    /// Pack tables are named as `pack.Table`.
    pub fn reset_table(&mut self, table: &str) -> LootResult<()> {
        let reference = TableRef::parse(table, &self.library);
        let id = self
            .library
            .resolve(&reference)
            .map(|t| t.id.clone())
            .ok_or_else(|| LootError::TableNotFound(table.to_string()))?;
        self.ledger
            .reset(&table_key(reference.collection.as_deref(), &id));
        Ok(())
    }
}
