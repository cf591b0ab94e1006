//! Record of completed trades.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lw_core::CurrencyAmount;
use lw_core::currency::format_amount;

use crate::request::TransactionKind;

/// A single completed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TradeLogEntry {
    /// Items moved between two actors.
    Transaction {
        /// Kind of exchange.
        kind: TransactionKind,
        /// Name of the actor that gave up the items.
        source: String,
        /// Name of the actor that received them.
        destination: String,
        /// `(name, quantity)` per moved line.
        items: Vec<(String, u32)>,
        /// Price paid in the base denomination (0 for free moves).
        cost: f64,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A looter emptied a loot pile's purse.
    CoinsLooted {
        /// Loot pile name.
        from: String,
        /// Looter name.
        to: String,
        /// Coins moved.
        amount: CurrencyAmount,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A loot pile's coins were shared among observers.
    CoinsDistributed {
        /// Loot pile name.
        from: String,
        /// Names of the observers that received a share.
        recipients: Vec<String>,
        /// What each observer received.
        share: CurrencyAmount,
        /// What stayed on the pile.
        remainder: CurrencyAmount,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
}

/// A chronological log of trades.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeLog {
    entries: Vec<TradeLogEntry>,
}

impl TradeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, entry: TradeLogEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[TradeLogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the log as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Trade Log\n\n");
        for entry in &self.entries {
            match entry {
                TradeLogEntry::Transaction {
                    kind,
                    source,
                    destination,
                    items,
                    cost,
                    ..
                } => {
                    out.push_str(&format!("**{kind}**: {source} -> {destination}\n"));
                    for (name, quantity) in items {
                        out.push_str(&format!("- {quantity}x {name}\n"));
                    }
                    if *cost > 0.0 {
                        out.push_str(&format!("  *Price*: {} gp\n", format_amount(*cost)));
                    }
                    out.push('\n');
                }
                TradeLogEntry::CoinsLooted {
                    from, to, amount, ..
                } => {
                    out.push_str(&format!("**Coins**: {to} looted {amount} from {from}\n\n"));
                }
                TradeLogEntry::CoinsDistributed {
                    from,
                    recipients,
                    share,
                    remainder,
                    ..
                } => {
                    out.push_str(&format!(
                        "**Shared** {from}: {share} each to {}\n",
                        recipients.join(", ")
                    ));
                    out.push_str(&format!("  *Left behind*: {remainder}\n\n"));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lw_core::Denomination;

    #[test]
    fn export_lists_items_and_price() {
        let mut log = TradeLog::new();
        assert!(log.is_empty());
        log.append(TradeLogEntry::Transaction {
            kind: TransactionKind::Buy,
            source: "Bram".to_string(),
            destination: "Ayla".to_string(),
            items: vec![("Rope".to_string(), 2)],
            cost: 2.0,
            timestamp: Utc::now(),
        });
        log.append(TradeLogEntry::CoinsLooted {
            from: "Chest".to_string(),
            to: "Ayla".to_string(),
            amount: CurrencyAmount::of(Denomination::Gp, 12.0),
            timestamp: Utc::now(),
        });
        assert_eq!(log.len(), 2);

        let md = log.export_markdown();
        assert!(md.starts_with("# Trade Log"));
        assert!(md.contains("**buy**: Bram -> Ayla"));
        assert!(md.contains("- 2x Rope"));
        assert!(md.contains("*Price*: 2 gp"));
        assert!(md.contains("Ayla looted 12gp from Chest"));
    }

    #[test]
    fn free_moves_omit_price() {
        let mut log = TradeLog::new();
        log.append(TradeLogEntry::Transaction {
            kind: TransactionKind::Give,
            source: "Ayla".to_string(),
            destination: "Bo".to_string(),
            items: vec![("Torch".to_string(), 1)],
            cost: 0.0,
            timestamp: Utc::now(),
        });
        assert!(!log.export_markdown().contains("Price"));
    }
}
