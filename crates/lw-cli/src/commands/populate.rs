use std::path::Path;

use colored::Colorize;
use lw_core::Notices;
use lw_loot::LootGenerator;

use crate::campaign::{Campaign, actor_id};

pub fn run(
    campaign_path: &Path,
    actors: &[String],
    table: Option<&str>,
    seed: Option<u64>,
    output: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let mut campaign = Campaign::load(campaign_path)?;
    let mut store = campaign.store()?;
    let ids = actors
        .iter()
        .map(|name| actor_id(&store, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut generator = LootGenerator::new(
        campaign.config.loot.clone(),
        campaign.tables.clone(),
        campaign.catalogs.clone(),
        super::roller(seed),
    )
    .map_err(|e| e.to_string())?;

    let mut notices = Notices::new();
    let reports = generator
        .populate_all(&mut store, &ids, table, &mut notices)
        .map_err(|e| e.to_string())?;
    super::print_notice_summary(&notices);

    if json {
        let text = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{text}");
    } else {
        println!("  {} {} actor(s)", "Populated".bold(), reports.len());
        println!();
        for report in &reports {
            print!("{report}");
        }
    }

    campaign.absorb(&store);
    super::save_if_requested(&campaign, output)
}
