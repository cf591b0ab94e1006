use std::path::Path;

use lw_core::{FormulaContext, Notices};

pub fn run(campaign: Option<&Path>, formula: &str, seed: Option<u64>) -> Result<(), String> {
    let engine = super::currency_engine(campaign)?;
    let mut dice = super::roller(seed);
    let mut notices = Notices::new();

    let purse = engine.generate_currency(formula, &mut dice, &mut notices, &FormulaContext::new());
    super::print_notice_summary(&notices);

    println!("  {purse}");
    println!(
        "  worth {} {}",
        lw_core::currency::format_amount(engine.to_base(&purse)),
        engine.rates().base()
    );
    Ok(())
}
