//! Recursive sampling of roll tables.

use lw_core::{FormulaContext, Notifier};
use lw_dice::Roller;

use crate::draw::DrawResult;
use crate::error::{LootError, LootResult};
use crate::ledger::{DrawLedger, table_key};
use crate::library::TableLibrary;
use crate::table::{DocumentKind, EntryPayload, RollTable};

/// Deepest table nesting a roll may reach. The top-level table is depth 0.
pub const MAX_DEPTH: usize = 5;

/// Options for a single table roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollOptions {
    /// Number of draws requested.
    pub total: u32,
}

impl Default for RollOptions {
    fn default() -> Self {
        Self { total: 1 }
    }
}

impl RollOptions {
    /// Request `total` draws.
    pub fn with_total(mut self, total: u32) -> Self {
        self.total = total;
        self
    }
}

/// Draws entries from tables, following references into nested tables.
pub struct TableRoller<'a> {
    pub(crate) library: &'a TableLibrary,
    pub(crate) ledger: &'a mut DrawLedger,
    pub(crate) dice: &'a mut Roller,
    pub(crate) notifier: &'a mut dyn Notifier,
    pub(crate) context: &'a FormulaContext,
}

impl<'a> TableRoller<'a> {
    /// Create a roller over `library`, recording exhausted entries in `ledger`.
    ///
    /// Formulas are evaluated against `context`.
    pub fn new(
        library: &'a TableLibrary,
        ledger: &'a mut DrawLedger,
        dice: &'a mut Roller,
        notifier: &'a mut dyn Notifier,
        context: &'a FormulaContext,
    ) -> Self {
        Self {
            library,
            ledger,
            dice,
            notifier,
            context,
        }
    }

    /// Draw `options.total` results from the world table `table`.
    ///
    /// Fails only when nested tables exceed [`MAX_DEPTH`]; configuration
    /// problems are reported to the notifier and yield no results for the
    /// affected table.
    pub fn roll(&mut self, table: &RollTable, options: RollOptions) -> LootResult<Vec<DrawResult>> {
        self.roll_at(table, &table.id, options.total, 0)
    }

    /// Draw from `table` as if it were nested `depth` levels deep.
    ///
    /// `key` identifies the table in the draw ledger; see [`table_key`].
    pub fn roll_at(
        &mut self,
        table: &RollTable,
        key: &str,
        total: u32,
        depth: usize,
    ) -> LootResult<Vec<DrawResult>> {
        if depth > MAX_DEPTH {
            return Err(LootError::DepthExceeded {
                table: table.name.clone(),
            });
        }
        if !self.check_table(table) {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        let mut outstanding = total;
        while outstanding > 0 {
            let picks = if table.replacement {
                let picks = (0..outstanding)
                    .filter_map(|_| self.pick_by_formula(table))
                    .collect::<Vec<_>>();
                outstanding = 0;
                picks
            } else {
                let picks = self.draw_batch(table, key, outstanding);
                if picks.is_empty() {
                    break;
                }
                let drawn = u32::try_from(picks.len()).unwrap_or(u32::MAX);
                outstanding = outstanding.saturating_sub(drawn);
                picks
            };

            for index in picks {
                results.extend(self.expand(table, index, depth)?);
            }
        }

        tracing::debug!(
            "rolled {} result(s) from table {} at depth {depth}",
            results.len(),
            table.name
        );
        Ok(results)
    }

    /// Report tables that cannot be rolled.
    fn check_table(&mut self, table: &RollTable) -> bool {
        let problem = if table.formula.as_deref().is_none_or(|f| f.trim().is_empty()) {
            "has no roll formula"
        } else if table.entries.is_empty() {
            "has no entries"
        } else if table.total_weight() == 0 {
            "has no entry with a positive weight"
        } else {
            return true;
        };
        self.notifier
            .error(&format!("table \"{}\" {problem}, skipped", table.name));
        false
    }

    /// Roll the table formula and find the matching entry.
    fn pick_by_formula(&mut self, table: &RollTable) -> Option<usize> {
        let formula = table.formula.as_deref().unwrap_or("1");
        let roll = self.dice.roll_formula(formula, self.context);
        let index = table.entry_for_roll(roll);
        if index.is_none() {
            tracing::warn!("roll {roll} on table {} matched no entry", table.name);
        }
        index
    }

    /// Draw up to `wanted` distinct undrawn entries, weighted.
    ///
    /// Resets the table first if every entry is exhausted.
    fn draw_batch(&mut self, table: &RollTable, key: &str, wanted: u32) -> Vec<usize> {
        let mut pool = self.undrawn(table, key);
        if pool.is_empty() {
            self.ledger.reset(key);
            pool = self.undrawn(table, key);
        }

        let batch = pool.len().min(usize::try_from(wanted).unwrap_or(usize::MAX));
        let mut picks = Vec::with_capacity(batch);
        for _ in 0..batch {
            let Some(position) = self.weighted_pick(table, &pool) else {
                break;
            };
            let index = pool.remove(position);
            self.ledger.mark(key, index);
            picks.push(index);
        }
        picks
    }

    fn undrawn(&self, table: &RollTable, key: &str) -> Vec<usize> {
        (0..table.entries.len())
            .filter(|&i| table.entries[i].weight > 0 && !self.ledger.is_drawn(key, i))
            .collect()
    }

    /// Position in `pool` of a weighted random entry.
    fn weighted_pick(&mut self, table: &RollTable, pool: &[usize]) -> Option<usize> {
        let total: u64 = pool.iter().map(|&i| u64::from(table.entries[i].weight)).sum();
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        if total == 0 {
            return None;
        }
        let mut roll = self.dice.random_range(1..=total);
        for (position, &index) in pool.iter().enumerate() {
            let weight = table.entries[index].weight;
            if roll <= weight {
                return Some(position);
            }
            roll -= weight;
        }
        pool.len().checked_sub(1)
    }

    /// Turn a drawn entry into results, recursing into referenced tables.
    fn expand(
        &mut self,
        table: &RollTable,
        index: usize,
        depth: usize,
    ) -> LootResult<Vec<DrawResult>> {
        let Some(entry) = table.entries.get(index) else {
            return Ok(Vec::new());
        };
        let formula = entry.quantity.as_deref().unwrap_or("1");
        let quantity = u32::try_from(self.dice.roll_formula(formula, self.context).max(0))
            .unwrap_or(u32::MAX);

        let library = self.library;
        let inner = match &entry.payload {
            EntryPayload::Document {
                kind: DocumentKind::Table,
                id,
                name,
            } => match library.get(id).or_else(|| library.get(name)) {
                Some(inner) => Some((inner, inner.id.clone())),
                None => {
                    self.notifier.error(&format!(
                        "table \"{}\" references missing table \"{name}\"",
                        table.name
                    ));
                    return Ok(Vec::new());
                }
            },
            EntryPayload::Compendium { collection, id, .. } if library.has_pack(collection) => {
                match library.pack_table(collection, id) {
                    Some(inner) => Some((inner, table_key(Some(collection), &inner.id))),
                    None => {
                        self.notifier.error(&format!(
                            "table pack \"{collection}\" has no table \"{id}\""
                        ));
                        return Ok(Vec::new());
                    }
                }
            }
            _ => None,
        };

        match inner {
            Some((inner, key)) => self.roll_at(inner, &key, quantity, depth + 1),
            None => {
                let result = DrawResult::from_entry(&table.id, entry, depth);
                Ok(vec![result; usize::try_from(quantity).unwrap_or(0)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawResultKind;
    use crate::table::TableEntry;
    use lw_core::Notices;
    use std::collections::HashSet;

    struct Fixture {
        library: TableLibrary,
        ledger: DrawLedger,
        dice: Roller,
        notices: Notices,
        context: FormulaContext,
    }

    impl Fixture {
        fn new(library: TableLibrary) -> Self {
            Self {
                library,
                ledger: DrawLedger::new(),
                dice: Roller::new(11),
                notices: Notices::new(),
                context: FormulaContext::new(),
            }
        }

        fn roll(&mut self, table_id: &str, total: u32) -> LootResult<Vec<DrawResult>> {
            let table = self.library.get(table_id).unwrap().clone();
            TableRoller::new(
                &self.library,
                &mut self.ledger,
                &mut self.dice,
                &mut self.notices,
                &self.context,
            )
            .roll(&table, RollOptions::default().with_total(total))
        }
    }

    fn letters(replacement: bool) -> RollTable {
        ["A", "B", "C", "D"]
            .into_iter()
            .fold(
                RollTable::new("letters", "Letters")
                    .with_formula("1d4")
                    .with_replacement(replacement),
                |table, text| table.with_entry(TableEntry::text(text)),
            )
    }

    fn nested_reference(id: &str) -> TableEntry {
        TableEntry::with_payload(EntryPayload::Document {
            kind: DocumentKind::Table,
            id: id.to_string(),
            name: id.to_string(),
        })
    }

    #[test]
    fn replacement_draws_requested_total() {
        let mut library = TableLibrary::new();
        library.insert(letters(true));
        let mut fx = Fixture::new(library);
        let results = fx.roll("letters", 10).unwrap();
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.kind == DrawResultKind::Text));
    }

    #[test]
    fn no_replacement_cycle_has_no_duplicates_and_one_reset() {
        let mut library = TableLibrary::new();
        library.insert(letters(false));
        let mut fx = Fixture::new(library);

        let results = fx.roll("letters", 6).unwrap();
        assert_eq!(results.len(), 6);
        let first_cycle: HashSet<_> = results[..4].iter().map(|r| r.text.clone()).collect();
        assert_eq!(first_cycle.len(), 4);
        let second_cycle: HashSet<_> = results[4..].iter().map(|r| r.text.clone()).collect();
        assert_eq!(second_cycle.len(), 2);
        assert_eq!(fx.ledger.reset_count("letters"), 1);
        assert_eq!(fx.ledger.drawn_count("letters"), 2);
    }

    #[test]
    fn ledger_persists_between_rolls() {
        let mut library = TableLibrary::new();
        library.insert(letters(false));
        let mut fx = Fixture::new(library);

        let mut seen = HashSet::new();
        for _ in 0..4 {
            let results = fx.roll("letters", 1).unwrap();
            assert!(seen.insert(results[0].text.clone()));
        }
        assert_eq!(fx.ledger.reset_count("letters"), 0);
        fx.roll("letters", 1).unwrap();
        assert_eq!(fx.ledger.reset_count("letters"), 1);
    }

    #[test]
    fn quantity_formula_multiplies_results() {
        let mut library = TableLibrary::new();
        library.insert(
            RollTable::new("t", "Torches")
                .with_formula("1d1")
                .with_entry(TableEntry::text("Torch").with_quantity("3")),
        );
        let mut fx = Fixture::new(library);
        let results = fx.roll("t", 2).unwrap();
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn self_reference_exceeds_depth() {
        let mut library = TableLibrary::new();
        library.insert(
            RollTable::new("loop", "Loop")
                .with_formula("1d1")
                .with_entry(nested_reference("loop")),
        );
        let mut fx = Fixture::new(library);
        let err = fx.roll("loop", 1).unwrap_err();
        assert!(matches!(err, LootError::DepthExceeded { .. }));
    }

    #[test]
    fn chain_of_max_depth_is_allowed() {
        let mut library = TableLibrary::new();
        for level in 0..MAX_DEPTH {
            library.insert(
                RollTable::new(format!("t{level}"), format!("Level {level}"))
                    .with_formula("1d1")
                    .with_entry(nested_reference(&format!("t{}", level + 1))),
            );
        }
        library.insert(
            RollTable::new(format!("t{MAX_DEPTH}"), "Bottom")
                .with_formula("1d1")
                .with_entry(TableEntry::text("Treasure")),
        );
        let mut fx = Fixture::new(library);
        let results = fx.roll("t0", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Treasure");
        assert_eq!(results[0].depth, MAX_DEPTH);
    }

    #[test]
    fn missing_formula_is_reported_and_siblings_continue() {
        let mut library = TableLibrary::new();
        library.insert(
            RollTable::new("outer", "Outer")
                .with_formula("1d2")
                .with_replacement(false)
                .with_entry(nested_reference("broken"))
                .with_entry(TableEntry::text("Coin")),
        );
        library.insert(RollTable::new("broken", "Broken").with_entry(TableEntry::text("x")));
        let mut fx = Fixture::new(library);
        let results = fx.roll("outer", 2).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Coin");
        assert_eq!(fx.notices.errors().count(), 1);
        assert!(fx.notices.contains("no roll formula"));
    }

    #[test]
    fn roll_outside_ranges_yields_nothing() {
        let mut library = TableLibrary::new();
        library.insert(
            RollTable::new("gap", "Gap")
                .with_formula("5")
                .with_entry(TableEntry::text("Low").with_range(1, 2)),
        );
        let mut fx = Fixture::new(library);
        assert!(fx.roll("gap", 3).unwrap().is_empty());
    }

    #[test]
    fn compendium_table_reference_recurses() {
        let mut library = TableLibrary::new();
        library.add_pack(
            "pack-tables",
            vec![
                RollTable::new("gems", "Gems")
                    .with_formula("1d1")
                    .with_entry(TableEntry::text("Ruby")),
            ],
        );
        library.insert(
            RollTable::new("hoard", "Hoard")
                .with_formula("1d1")
                .with_entry(
                    TableEntry::with_payload(EntryPayload::Compendium {
                        collection: "pack-tables".to_string(),
                        id: "gems".to_string(),
                        name: "Gems".to_string(),
                    })
                    .with_quantity("2"),
                ),
        );
        let mut fx = Fixture::new(library);
        let results = fx.roll("hoard", 1).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.text == "Ruby" && r.depth == 1));
    }

    #[test]
    fn pack_and_world_tables_with_same_id_draw_independently() {
        let mut library = TableLibrary::new();
        library.insert(
            RollTable::new("gems", "World Gems")
                .with_formula("1d1")
                .with_replacement(false)
                .with_entry(TableEntry::text("Opal")),
        );
        library.add_pack(
            "pack",
            vec![
                RollTable::new("gems", "Pack Gems")
                    .with_formula("1d2")
                    .with_replacement(false)
                    .with_entry(TableEntry::text("Ruby"))
                    .with_entry(TableEntry::text("Pearl")),
            ],
        );
        library.insert(
            RollTable::new("hoard", "Hoard")
                .with_formula("1d1")
                .with_entry(TableEntry::with_payload(EntryPayload::Compendium {
                    collection: "pack".to_string(),
                    id: "gems".to_string(),
                    name: "Pack Gems".to_string(),
                })),
        );
        let mut fx = Fixture::new(library);

        let pack_draw = fx.roll("hoard", 1).unwrap();
        assert_eq!(pack_draw.len(), 1);
        assert_ne!(pack_draw[0].text, "Opal");
        assert_eq!(fx.ledger.drawn_count("pack.gems"), 1);

        let world_draw = fx.roll("gems", 1).unwrap();
        assert_eq!(world_draw[0].text, "Opal");
        assert_eq!(fx.ledger.reset_count("gems"), 0);
        assert_eq!(fx.ledger.reset_count("pack.gems"), 0);
        assert_eq!(fx.ledger.drawn_count("gems"), 1);
    }
}
