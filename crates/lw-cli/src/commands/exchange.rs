use std::path::Path;

use lw_core::CurrencyAmount;

pub fn run(campaign: Option<&Path>, amount: &str, only: Option<&str>) -> Result<(), String> {
    let engine = super::currency_engine(campaign)?;
    let coins = super::parse_amount(amount)?;
    let desired = only.map(super::parse_denominations).transpose()?;
    if desired.as_ref().is_some_and(|d| d.is_empty()) {
        return Err("--only needs at least one denomination".to_string());
    }

    let mut result = CurrencyAmount::blank();
    for (denomination, value) in coins.non_zero() {
        result = engine.exchange(value, denomination, result, desired.as_deref());
    }

    println!("  {coins} = {result}");
    Ok(())
}
