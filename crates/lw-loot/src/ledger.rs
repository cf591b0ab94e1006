//! Per-table record of entries drawn without replacement.

use std::collections::{BTreeSet, HashMap};

/// Ledger key of a table: its id, qualified as `pack.id` for pack tables.
///
/// World tables and pack tables may share an id, so each origin gets its own
/// record.
pub fn table_key(collection: Option<&str>, id: &str) -> String {
    match collection {
        Some(pack) => format!("{pack}.{id}"),
        None => id.to_string(),
    }
}

/// Tracks which entries of each no-replacement table are exhausted.
///
/// Tables themselves stay immutable; the ledger is the only state a draw
/// mutates.
#[derive(Debug, Clone, Default)]
pub struct DrawLedger {
    exhausted: HashMap<String, BTreeSet<usize>>,
    resets: HashMap<String, u32>,
}

impl DrawLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if entry `index` of `table` has been drawn since the last reset.
    pub fn is_drawn(&self, table: &str, index: usize) -> bool {
        self.exhausted
            .get(table)
            .is_some_and(|drawn| drawn.contains(&index))
    }

    /// Mark an entry as drawn.
    pub fn mark(&mut self, table: &str, index: usize) {
        self.exhausted
            .entry(table.to_string())
            .or_default()
            .insert(index);
    }

    /// Number of drawn entries of `table`.
    pub fn drawn_count(&self, table: &str) -> usize {
        self.exhausted.get(table).map_or(0, BTreeSet::len)
    }

    /// Make every entry of `table` eligible again.
    pub fn reset(&mut self, table: &str) {
        self.exhausted.remove(table);
        *self.resets.entry(table.to_string()).or_default() += 1;
        tracing::debug!("reset drawn entries of table {table}");
    }

    /// How many times `table` has been reset.
    pub fn reset_count(&self, table: &str) -> u32 {
        self.resets.get(table).copied().unwrap_or(0)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.exhausted.clear();
        self.resets.clear();
    }
}
