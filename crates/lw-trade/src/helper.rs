//! Transaction resolution.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

use lw_core::{ActorId, CurrencyAmount, Denomination, Item, ItemId, Notifier, RecordStore};
use lw_currency::{CurrencyEngine, round5};

use crate::config::TradeConfig;
use crate::error::{TradeError, TradeResult};
use crate::log::{TradeLog, TradeLogEntry};
use crate::request::{TransactionKind, TransactionRequest};

/// The result of a completed transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOutcome {
    /// Kind of exchange.
    pub kind: TransactionKind,
    /// `(name, quantity)` per moved line.
    pub moved: Vec<(String, u32)>,
    /// Price paid by the destination, in gold pieces.
    pub cost: f64,
    /// The source's purse afterwards.
    pub source_purse: CurrencyAmount,
    /// The destination's purse afterwards.
    pub destination_purse: CurrencyAmount,
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .moved
            .iter()
            .map(|(name, quantity)| format!("{quantity}x {name}"))
            .collect();
        write!(f, "{}: {}", self.kind, lines.join(", "))?;
        if self.kind.is_paid() {
            write!(f, " for {} gp", round5(self.cost))?;
        }
        Ok(())
    }
}

/// How a loot pile's coins were shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoinDistribution {
    /// What each recipient received.
    pub share: CurrencyAmount,
    /// What stayed on the pile.
    pub remainder: CurrencyAmount,
    /// Number of recipients.
    pub recipients: u32,
}

/// Resolves buy, sell, loot, and give requests against a [`RecordStore`].
#[derive(Debug, Clone, Default)]
pub struct TradeHelper {
    config: TradeConfig,
    currency: CurrencyEngine,
    log: TradeLog,
}

impl TradeHelper {
    /// Create a helper, validating the currency configuration.
    pub fn new(config: TradeConfig) -> TradeResult<Self> {
        let currency = CurrencyEngine::new(config.currency.clone())?;
        Ok(Self {
            config,
            currency,
            log: TradeLog::new(),
        })
    }

    /// The trade configuration.
    pub fn config(&self) -> &TradeConfig {
        &self.config
    }

    /// The currency engine used for settlement.
    pub fn currency(&self) -> &CurrencyEngine {
        &self.currency
    }

    /// Every completed operation so far.
    pub fn log(&self) -> &TradeLog {
        &self.log
    }

    /// Price modifier for a request: its own override, else the configured
    /// one for its kind. Free kinds always use 0.
    pub fn modifier_for(&self, request: &TransactionRequest) -> f64 {
        match request.kind {
            TransactionKind::Buy => request.price_modifier.unwrap_or(self.config.price_modifier),
            TransactionKind::Sell => request.price_modifier.unwrap_or(self.config.sell_modifier),
            TransactionKind::Loot | TransactionKind::Give => 0.0,
        }
    }

    /// Move the requested items from source to destination, settling the
    /// price for buys and sells.
    ///
    /// Every line and the destination's funds are checked before anything
    /// is written; on error neither actor changes.
    pub fn resolve(
        &mut self,
        store: &mut dyn RecordStore,
        request: &TransactionRequest,
        notifier: &mut dyn Notifier,
    ) -> TradeResult<TradeOutcome> {
        if request.source == request.destination {
            return Err(TradeError::SameActor);
        }

        let source = store.actor(request.source)?;
        let destination = store.actor(request.destination)?;
        let source_name = source.name.clone();
        let destination_name = destination.name.clone();
        let lines = requested_lines(&source.items, &source_name, request)?;

        let modifier = self.modifier_for(request).max(0.0);
        let cost = round5(
            lines
                .iter()
                .map(|(item, quantity)| item.price * f64::from(*quantity) * modifier)
                .sum(),
        );

        // Prices are in gp; settlement works in the base denomination.
        let rates = self.currency.rates();
        let base_cost = cost * rates.rate(Denomination::Gp, rates.base());

        // The destination pays in both paid kinds; only the modifier differs.
        let mut source_purse = source.currency;
        let mut destination_purse = destination.currency;
        if request.kind.is_paid()
            && !self.currency.update_funds(
                &mut source_purse,
                &mut destination_purse,
                base_cost,
                notifier,
            )
        {
            return Err(TradeError::InsufficientFunds {
                buyer: destination_name,
                cost,
            });
        }

        if request.kind.is_paid() {
            store.update_currency(request.source, source_purse)?;
            store.update_currency(request.destination, destination_purse)?;
        }
        for (item, quantity) in &lines {
            move_item(store, request.source, request.destination, item, *quantity)?;
        }

        let moved: Vec<(String, u32)> = lines
            .iter()
            .map(|(item, quantity)| (item.name.clone(), *quantity))
            .collect();
        tracing::info!(
            "{} {source_name} -> {destination_name}: {} line(s), {cost} gp",
            request.kind,
            moved.len()
        );
        self.log.append(TradeLogEntry::Transaction {
            kind: request.kind,
            source: source_name,
            destination: destination_name,
            items: moved.clone(),
            cost: if request.kind.is_paid() { cost } else { 0.0 },
            timestamp: Utc::now(),
        });

        Ok(TradeOutcome {
            kind: request.kind,
            moved,
            cost: if request.kind.is_paid() { cost } else { 0.0 },
            source_purse: store.actor(request.source)?.currency,
            destination_purse: store.actor(request.destination)?.currency,
        })
    }

    /// Move every coin from a loot pile to the looter. Returns what moved.
    pub fn loot_currency(
        &mut self,
        store: &mut dyn RecordStore,
        loot_actor: ActorId,
        looter: ActorId,
    ) -> TradeResult<CurrencyAmount> {
        if loot_actor == looter {
            return Err(TradeError::SameActor);
        }
        let pile = store.actor(loot_actor)?;
        let (from, coins) = (pile.name.clone(), pile.currency);
        let receiver = store.actor(looter)?;
        let (to, purse) = (receiver.name.clone(), receiver.currency);

        store.update_currency(looter, self.currency.merge(&purse, &coins))?;
        store.update_currency(loot_actor, CurrencyAmount::blank())?;

        tracing::info!("{to} looted {coins} from {from}");
        self.log.append(TradeLogEntry::CoinsLooted {
            from,
            to,
            amount: coins,
            timestamp: Utc::now(),
        });
        Ok(coins)
    }

    /// Share a loot pile's coins among `observers`.
    ///
    /// Each observer receives the per-denomination share and the pile keeps
    /// the remainder computed by [`CurrencyEngine::shares_and_remainder`].
    pub fn distribute_coins(
        &mut self,
        store: &mut dyn RecordStore,
        loot_actor: ActorId,
        observers: &[ActorId],
    ) -> TradeResult<CoinDistribution> {
        if observers.is_empty() {
            return Err(TradeError::NoRecipients);
        }
        if observers.contains(&loot_actor) {
            return Err(TradeError::SameActor);
        }

        let pile = store.actor(loot_actor)?;
        let (from, coins) = (pile.name.clone(), pile.currency);
        let mut recipients = Vec::with_capacity(observers.len());
        for id in observers {
            let observer = store.actor(*id)?;
            recipients.push((*id, observer.name.clone(), observer.currency));
        }

        let split = u32::try_from(observers.len()).unwrap_or(u32::MAX);
        let (share, remainder) = self.currency.shares_and_remainder(&coins, split)?;

        for (id, _, purse) in &recipients {
            store.update_currency(*id, self.currency.merge(purse, &share))?;
        }
        store.update_currency(loot_actor, remainder)?;

        tracing::info!("shared {share} from {from} with {split} observer(s), {remainder} left");
        self.log.append(TradeLogEntry::CoinsDistributed {
            from,
            recipients: recipients.into_iter().map(|(_, name, _)| name).collect(),
            share,
            remainder,
            timestamp: Utc::now(),
        });
        Ok(CoinDistribution {
            share,
            remainder,
            recipients: split,
        })
    }
}

/// Resolve request lines against the source's inventory, folding repeated
/// lines for the same item together.
fn requested_lines(
    owned: &[Item],
    owner: &str,
    request: &TransactionRequest,
) -> TradeResult<Vec<(Item, u32)>> {
    let mut lines: Vec<(Item, u32)> = Vec::new();
    for line in &request.items {
        if line.quantity == 0 {
            return Err(TradeError::ZeroQuantity(line.item));
        }
        match lines.iter_mut().find(|(item, _)| item.id == line.item) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(line.quantity),
            None => {
                let item = owned.iter().find(|i| i.id == line.item).ok_or_else(|| {
                    TradeError::ItemNotOwned {
                        owner: owner.to_string(),
                        item: line.item,
                    }
                })?;
                lines.push((item.clone(), line.quantity));
            }
        }
    }

    if let Some((item, requested)) = lines.iter().find(|(item, qty)| *qty > item.quantity) {
        return Err(TradeError::NotEnough {
            owner: owner.to_string(),
            name: item.name.clone(),
            requested: *requested,
            available: item.quantity,
        });
    }
    Ok(lines)
}

/// Take `quantity` copies of `item` off `from` and stack them onto `to`.
fn move_item(
    store: &mut dyn RecordStore,
    from: ActorId,
    to: ActorId,
    item: &Item,
    quantity: u32,
) -> TradeResult<()> {
    if quantity >= item.quantity {
        store.delete_items(from, &[item.id])?;
    } else {
        let mut rest = item.clone();
        rest.quantity -= quantity;
        store.update_item(from, rest)?;
    }

    match store.actor(to)?.find_stack(&item.name, item.price).cloned() {
        Some(mut stack) => {
            stack.quantity = stack.quantity.saturating_add(quantity);
            store.update_item(to, stack)?;
        }
        None => {
            let mut copy = item.clone();
            copy.id = ItemId::new();
            copy.quantity = quantity;
            store.create_item(to, copy)?;
        }
    }
    Ok(())
}
