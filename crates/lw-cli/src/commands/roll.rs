use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use lw_core::{FormulaContext, Notices};
use lw_loot::{DrawResultKind, LootGenerator, RollOptions};

use crate::campaign::Campaign;

pub fn run(campaign: &Path, table: &str, times: u32, seed: Option<u64>) -> Result<(), String> {
    let campaign = Campaign::load(campaign)?;
    let mut generator = LootGenerator::new(
        campaign.config.loot,
        campaign.tables,
        campaign.catalogs,
        super::roller(seed),
    )
    .map_err(|e| e.to_string())?;

    let mut notices = Notices::new();
    let draws = generator
        .roll_table(
            table,
            RollOptions::default().with_total(times),
            &FormulaContext::new(),
            &mut notices,
        )
        .map_err(|e| e.to_string())?;
    super::print_notice_summary(&notices);

    if draws.is_empty() {
        println!("  Nothing drawn.");
        return Ok(());
    }

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Result", "Kind", "Table", "Depth"]);
    for draw in &draws {
        let kind = match &draw.kind {
            DrawResultKind::Text => "text".to_string(),
            DrawResultKind::Document { kind, .. } => format!("{kind:?}").to_lowercase(),
            DrawResultKind::Compendium { collection, .. } => format!("compendium ({collection})"),
        };
        out.add_row(vec![
            draw.text.clone(),
            kind,
            draw.table.clone(),
            draw.depth.to_string(),
        ]);
    }

    println!("{out}");
    println!();
    println!("  {} result{}", draws.len(), if draws.len() == 1 { "" } else { "s" });

    Ok(())
}
