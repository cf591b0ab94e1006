pub mod currency;
pub mod exchange;
pub mod populate;
pub mod roll;
pub mod split;
pub mod trade;

use std::fs;
use std::path::Path;

use colored::Colorize;
use lw_core::{CurrencyAmount, Denomination, Notices};
use lw_currency::CurrencyEngine;
use lw_dice::Roller;
use lw_trade::TradeLog;

use crate::campaign::Campaign;

/// Seeded roller when a seed is given, otherwise one seeded from the OS.
fn roller(seed: Option<u64>) -> Roller {
    match seed {
        Some(seed) => Roller::new(seed),
        None => Roller::from_entropy(),
    }
}

/// Currency engine from the campaign's loot settings, or the defaults.
fn currency_engine(campaign: Option<&Path>) -> Result<CurrencyEngine, String> {
    match campaign {
        Some(path) => {
            let campaign = Campaign::load(path)?;
            CurrencyEngine::new(campaign.config.loot.currency).map_err(|e| e.to_string())
        }
        None => Ok(CurrencyEngine::default()),
    }
}

/// Write the campaign back if an output path was given.
fn save_if_requested(campaign: &Campaign, output: Option<&Path>) -> Result<(), String> {
    if let Some(path) = output {
        campaign.save(path)?;
        println!("  Saved campaign to {}", path.display());
    }
    Ok(())
}

/// Where a trade command writes its results.
#[derive(Clone, Copy)]
pub struct Outputs<'a> {
    /// Updated campaign file.
    pub campaign: Option<&'a Path>,
    /// Markdown export of the trade log.
    pub log: Option<&'a Path>,
}

/// Write the trade log as markdown if a log path was given.
fn write_log(log: &TradeLog, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        fs::write(path, log.export_markdown())
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!("  Wrote trade log to {}", path.display());
    }
    Ok(())
}

/// Print a one-line count of collected warnings and errors.
///
/// The messages themselves already went to stderr through the log.
fn print_notice_summary(notices: &Notices) {
    let errors = notices.errors().count();
    let warnings = notices.warnings().count();

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors.to_string().red().bold(),
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else if warnings > 0 {
        eprintln!(
            "  {} warning{}",
            warnings.to_string().yellow().bold(),
            if warnings == 1 { "" } else { "s" },
        );
    }
}

/// Parse `"5gp 3sp"` (or `"5gp,3sp"`) into a purse.
fn parse_amount(text: &str) -> Result<CurrencyAmount, String> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err("no coins given".to_string());
    }

    let mut amount = CurrencyAmount::blank();
    for token in tokens {
        let split = token
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| format!("missing denomination in \"{token}\""))?;
        let (number, symbol) = token.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid amount \"{number}\" in \"{token}\""))?;
        let denomination =
            Denomination::parse(symbol).ok_or_else(|| format!("unknown denomination \"{symbol}\""))?;
        amount.add(denomination, value);
    }
    Ok(amount)
}

/// Parse `"gp,sp"` into a denomination list.
fn parse_denominations(text: &str) -> Result<Vec<Denomination>, String> {
    text.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| Denomination::parse(s).ok_or_else(|| format!("unknown denomination \"{s}\"")))
        .collect()
}
