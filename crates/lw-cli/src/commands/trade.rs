use std::path::Path;

use colored::Colorize;
use lw_core::{Notices, RecordStore};
use lw_trade::{TradeHelper, TransactionKind, TransactionRequest};

use crate::campaign::{Campaign, actor_id};

pub fn run(
    campaign_path: &Path,
    kind: &str,
    source: &str,
    destination: &str,
    items: &[String],
    modifier: Option<f64>,
    outputs: super::Outputs<'_>,
) -> Result<(), String> {
    let kind = parse_kind(kind)?;
    let mut campaign = Campaign::load(campaign_path)?;
    let mut store = campaign.store()?;
    let source_id = actor_id(&store, source)?;
    let destination_id = actor_id(&store, destination)?;

    let mut request = TransactionRequest::new(source_id, destination_id, kind);
    if let Some(modifier) = modifier {
        request = request.with_price_modifier(modifier);
    }
    let owner = store.actor(source_id).map_err(|e| e.to_string())?;
    for spec in items {
        let (name, quantity) = parse_line(spec)?;
        let item = owner
            .find_item_by_name(name)
            .ok_or_else(|| format!("{} has no \"{name}\"", owner.name))?;
        request = request.with_item(item.id, quantity);
    }

    let mut helper = TradeHelper::new(campaign.config.trade.clone()).map_err(|e| e.to_string())?;
    let mut notices = Notices::new();
    let outcome = helper
        .resolve(&mut store, &request, &mut notices)
        .map_err(|e| e.to_string())?;
    super::print_notice_summary(&notices);

    println!("  {} {outcome}", "Done".green().bold());
    println!("    {source}: {}", outcome.source_purse);
    println!("    {destination}: {}", outcome.destination_purse);

    campaign.absorb(&store);
    super::save_if_requested(&campaign, outputs.campaign)?;
    super::write_log(helper.log(), outputs.log)
}

fn parse_kind(kind: &str) -> Result<TransactionKind, String> {
    match kind.to_lowercase().as_str() {
        "buy" => Ok(TransactionKind::Buy),
        "sell" => Ok(TransactionKind::Sell),
        "loot" => Ok(TransactionKind::Loot),
        "give" => Ok(TransactionKind::Give),
        _ => Err(format!(
            "unknown trade kind: \"{kind}\". Use: buy, sell, loot, give"
        )),
    }
}

/// `"Rope:3"` -> `("Rope", 3)`; a bare name means one copy.
fn parse_line(spec: &str) -> Result<(&str, u32), String> {
    match spec.rsplit_once(':') {
        Some((name, count)) => count
            .trim()
            .parse()
            .map(|n| (name.trim(), n))
            .map_err(|_| format!("invalid count in \"{spec}\"")),
        None => Ok((spec.trim(), 1)),
    }
}
