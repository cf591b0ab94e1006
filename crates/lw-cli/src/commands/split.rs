use std::path::Path;

use colored::Colorize;
use lw_trade::TradeHelper;

use crate::campaign::{Campaign, actor_id};

pub fn run(
    campaign_path: &Path,
    pile: &str,
    observers: &[String],
    take: bool,
    outputs: super::Outputs<'_>,
) -> Result<(), String> {
    let mut campaign = Campaign::load(campaign_path)?;
    let mut store = campaign.store()?;
    let pile_id = actor_id(&store, pile)?;
    let observer_ids = observers
        .iter()
        .map(|name| actor_id(&store, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut helper = TradeHelper::new(campaign.config.trade.clone()).map_err(|e| e.to_string())?;

    if take {
        let [looter] = observer_ids.as_slice() else {
            return Err("--take needs exactly one looter".to_string());
        };
        let coins = helper
            .loot_currency(&mut store, pile_id, *looter)
            .map_err(|e| e.to_string())?;
        println!("  {} {coins} from {pile}", "Looted".green().bold());
    } else {
        let split = helper
            .distribute_coins(&mut store, pile_id, &observer_ids)
            .map_err(|e| e.to_string())?;
        println!(
            "  {} {} each to {} observer(s)",
            "Shared".green().bold(),
            split.share,
            split.recipients
        );
        println!("    left on {pile}: {}", split.remainder);
    }

    campaign.absorb(&store);
    super::save_if_requested(&campaign, outputs.campaign)?;
    super::write_log(helper.log(), outputs.log)
}
