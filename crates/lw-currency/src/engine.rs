//! The currency engine: formulas, exchange, shares, and fund settlement.

use lw_core::{CurrencyAmount, Denomination, FormulaContext, Notifier};
use lw_dice::Roller;

use crate::config::{CurrencyConfig, Settlement};
use crate::error::{CurrencyError, CurrencyResult};
use crate::rates::ExchangeRates;

/// Round to five decimal places.
///
/// Applied before every floor so that `15.999999999` settles as `16`.
pub fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// Parses, converts, and settles currency amounts.
#[derive(Debug, Clone, Default)]
pub struct CurrencyEngine {
    config: CurrencyConfig,
}

impl CurrencyEngine {
    /// Create an engine, rejecting an invalid rate table.
    pub fn new(config: CurrencyConfig) -> CurrencyResult<Self> {
        config.rates.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &CurrencyConfig {
        &self.config
    }

    /// The active exchange rates.
    pub fn rates(&self) -> &ExchangeRates {
        &self.config.rates
    }

    /// Roll a currency formula such as `"1d4[gp], 1d20[sp], 1d50[cp]"`.
    ///
    /// Clauses are comma separated and whitespace is ignored. A clause that
    /// is not `dice[denomination]`, names an unknown denomination, or whose
    /// dice fail to evaluate is skipped with a warning. Rolled values are
    /// floored and never negative.
    pub fn generate_currency(
        &self,
        formula: &str,
        roller: &mut Roller,
        notifier: &mut dyn Notifier,
        context: &FormulaContext,
    ) -> CurrencyAmount {
        let mut purse = CurrencyAmount::blank();

        for raw in formula.split(',') {
            let clause: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if clause.is_empty() {
                continue;
            }

            let Some((dice, denomination)) = split_clause(&clause) else {
                notifier.warn(&format!(
                    "currency clause \"{clause}\" is not in the form dice[denomination], skipped"
                ));
                continue;
            };
            let Some(denomination) = Denomination::parse(denomination) else {
                notifier.warn(&format!(
                    "unknown denomination \"{denomination}\" in currency clause \"{clause}\", skipped"
                ));
                continue;
            };

            match roller.evaluate(dice, context) {
                Ok(evaluation) => {
                    let value = evaluation.total.floor().max(0.0);
                    tracing::debug!("currency clause {clause} rolled {value}");
                    purse.add(denomination, value);
                }
                Err(e) => notifier.warn(&format!(
                    "could not roll currency clause \"{clause}\": {e}, skipped"
                )),
            }
        }

        purse
    }

    /// Break `amount` of `source` down across the denomination chain and add
    /// the result into `target`.
    ///
    /// Higher denominations take whole units first; the source denomination
    /// takes what is left of itself; any fraction carries to lower
    /// denominations. With `desired`, only those denominations receive coins
    /// and leftover value lands in the lowest one allowed.
    pub fn exchange(
        &self,
        amount: f64,
        source: Denomination,
        target: CurrencyAmount,
        desired: Option<&[Denomination]>,
    ) -> CurrencyAmount {
        let rates = self.rates();
        let mut result = target;
        let mut remaining = amount;
        let mut last_allowed = None;

        for denomination in Denomination::ALL {
            if desired.is_some_and(|allowed| !allowed.contains(&denomination)) {
                continue;
            }
            last_allowed = Some(denomination);

            if denomination == source {
                let whole = round5(remaining).floor();
                result[denomination] += whole;
                remaining = round5(remaining - whole);
                continue;
            }

            let ratio = rates.ratio(source, denomination);
            let num = f64::from(ratio.num);
            let den = f64::from(ratio.den);
            let whole = round5(remaining * num / den).floor();
            if whole > 0.0 {
                result[denomination] += whole;
                remaining = round5(remaining - whole * den / num);
            }
        }

        if remaining != 0.0 {
            match last_allowed {
                Some(lowest) => {
                    result[lowest] += round5(remaining * rates.rate(source, lowest));
                }
                None => tracing::debug!("exchange of {amount}{source} has no allowed denomination"),
            }
        }

        result
    }

    /// Total value of a purse in the base denomination.
    pub fn to_base(&self, amount: &CurrencyAmount) -> f64 {
        self.value_in(amount, self.rates().base())
    }

    /// Total value of a purse in the lowest denomination.
    pub fn to_lowest(&self, amount: &CurrencyAmount) -> f64 {
        self.value_in(amount, Denomination::lowest())
    }

    /// Total value of a purse expressed in `denomination`.
    pub fn value_in(&self, amount: &CurrencyAmount, denomination: Denomination) -> f64 {
        amount
            .iter()
            .map(|(d, value)| value * self.rates().rate(d, denomination))
            .sum()
    }

    /// Split a purse `split` ways.
    ///
    /// Each share is `floor(amount / split)`. The remainder is
    /// `share % split`, not `amount - share * split`; callers that hand the
    /// remainder back to the source keep that behavior.
    pub fn shares_and_remainder(
        &self,
        amount: &CurrencyAmount,
        split: u32,
    ) -> CurrencyResult<(CurrencyAmount, CurrencyAmount)> {
        if split == 0 {
            return Err(CurrencyError::InvalidSplit(split));
        }
        let n = f64::from(split);
        let mut shares = CurrencyAmount::blank();
        let mut remainder = CurrencyAmount::blank();
        for (denomination, value) in amount.iter() {
            let share = (value / n).floor();
            shares[denomination] = share;
            remainder[denomination] = share % n;
        }
        Ok((shares, remainder))
    }

    /// Move `cost` (in the base denomination) from `buyer` to `seller`.
    ///
    /// Returns `false` and leaves both purses untouched when the buyer cannot
    /// afford it. Afterwards neither purse holds a negative amount and only
    /// the lowest denomination may be fractional.
    pub fn update_funds(
        &self,
        seller: &mut CurrencyAmount,
        buyer: &mut CurrencyAmount,
        cost: f64,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let available = round5(self.to_base(buyer));
        if available < round5(cost) {
            notifier.warn(&format!(
                "insufficient funds: {} {} needed, {} available",
                round5(cost),
                self.rates().base(),
                available
            ));
            return false;
        }

        let highest = Denomination::highest();
        let cost_high = cost * self.rates().rate(self.rates().base(), highest);

        let mut paid = match self.config.settlement {
            Settlement::Convert => {
                let total = self.value_in(buyer, highest);
                CurrencyAmount::of(highest, total - cost_high)
            }
            Settlement::Smooth => {
                let mut purse = *buyer;
                purse[highest] -= cost_high;
                self.borrow_down(&mut purse);
                purse
            }
        };
        self.smooth(&mut paid);

        let mut received = *seller;
        received[self.rates().base()] += cost;
        self.smooth(&mut received);

        tracing::debug!("settled {cost}: buyer {buyer} -> {paid}, seller {seller} -> {received}");
        *buyer = paid;
        *seller = received;
        true
    }

    /// Push each negative balance into the next-lower denomination.
    fn borrow_down(&self, purse: &mut CurrencyAmount) {
        for denomination in Denomination::ALL {
            let Some(lower) = denomination.next_lower() else {
                break;
            };
            if purse[denomination] < 0.0 {
                purse[lower] += purse[denomination] * self.rates().rate(denomination, lower);
                purse[denomination] = 0.0;
            }
        }
    }

    /// Flow fractional amounts down the chain so that every denomination but
    /// the lowest holds a whole number. Negative amounts clamp to zero.
    pub fn smooth(&self, purse: &mut CurrencyAmount) {
        for denomination in Denomination::ALL {
            let value = round5(purse[denomination]);
            let Some(lower) = denomination.next_lower() else {
                purse[denomination] = value.max(0.0);
                break;
            };
            let whole = value.floor();
            let fraction = round5(value - whole);
            purse[denomination] = whole.max(0.0);
            if fraction > 0.0 {
                purse[lower] += fraction * self.rates().rate(denomination, lower);
            }
        }
    }

    /// Sum two purses per denomination.
    pub fn merge(&self, a: &CurrencyAmount, b: &CurrencyAmount) -> CurrencyAmount {
        let mut merged = *a;
        merged.merge(b);
        merged
    }
}

/// Split `"2d6[gp]"` into `("2d6", "gp")`.
fn split_clause(clause: &str) -> Option<(&str, &str)> {
    let inner = clause.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let (dice, denomination) = (&inner[..open], &inner[open + 1..]);
    if dice.is_empty() || denomination.is_empty() || dice.contains(['[', ']']) {
        return None;
    }
    Some((dice, denomination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lw_core::Notices;
    use proptest::prelude::*;
    use Denomination::*;

    fn engine() -> CurrencyEngine {
        CurrencyEngine::default()
    }

    fn convert_engine() -> CurrencyEngine {
        CurrencyEngine::new(CurrencyConfig::default().with_settlement(Settlement::Convert)).unwrap()
    }

    fn generate(formula: &str) -> (CurrencyAmount, Notices) {
        let mut roller = Roller::new(7);
        let mut notices = Notices::new();
        let purse =
            engine().generate_currency(formula, &mut roller, &mut notices, &FormulaContext::new());
        (purse, notices)
    }

    fn gp(n: f64) -> CurrencyAmount {
        CurrencyAmount::of(Gp, n)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn one_d_one_gold() {
        let (purse, notices) = generate("1d1[gp]");
        assert_eq!(purse, gp(1.0));
        assert!(notices.is_empty());
    }

    #[test]
    fn clauses_accumulate() {
        let (purse, _) = generate("2[gp], 3 [ sp ], 1d1 [gp]");
        assert_eq!(purse.gp, 3.0);
        assert_eq!(purse.sp, 3.0);
    }

    #[test]
    fn bad_clauses_skipped_with_warning() {
        let (purse, notices) = generate("1d4 gp, 5[xp], 2[cp], [sp], 1d[gp]");
        assert_eq!(purse, CurrencyAmount::of(Cp, 2.0));
        assert_eq!(notices.warnings().count(), 4);
        assert!(notices.contains("xp"));
    }

    #[test]
    fn negative_rolls_clamp_to_zero() {
        let (purse, _) = generate("1 - 10[gp]");
        assert_eq!(purse.gp, 0.0);
    }

    #[test]
    fn empty_formula_is_blank() {
        let (purse, notices) = generate("");
        assert!(purse.is_empty());
        assert!(notices.is_empty());
    }

    #[test]
    fn exchange_copper_upward() {
        let purse = engine().exchange(1000.0, Cp, CurrencyAmount::blank(), None);
        assert_eq!(purse, CurrencyAmount::of(Pp, 1.0));

        let purse = engine().exchange(1234.0, Cp, CurrencyAmount::blank(), None);
        assert_eq!(purse.pp, 1.0);
        assert_eq!(purse.gp, 2.0);
        assert_eq!(purse.ep, 0.0);
        assert_eq!(purse.sp, 3.0);
        assert_eq!(purse.cp, 4.0);
    }

    #[test]
    fn exchange_restricted_denominations() {
        let purse = engine().exchange(1234.0, Cp, CurrencyAmount::blank(), Some(&[Gp, Sp][..]));
        assert_eq!(purse.pp, 0.0);
        assert_eq!(purse.gp, 12.0);
        assert!(close(purse.sp, 3.4));
        assert_eq!(purse.cp, 0.0);
        assert!(close(engine().to_lowest(&purse), 1234.0));
    }

    #[test]
    fn exchange_leftover_goes_to_lowest_allowed() {
        let purse = engine().exchange(1234.0, Cp, CurrencyAmount::blank(), Some(&[Gp, Ep][..]));
        assert_eq!(purse.gp, 12.0);
        assert!(close(purse.ep, 0.68));
        assert!(close(engine().to_lowest(&purse), 1234.0));
    }

    #[test]
    fn exchange_with_nothing_allowed_is_noop() {
        let purse = engine().exchange(50.0, Cp, gp(1.0), Some(&[][..]));
        assert_eq!(purse, gp(1.0));
    }

    #[test]
    fn exchange_fraction_flows_down() {
        let purse = engine().exchange(2.55, Gp, CurrencyAmount::blank(), None);
        assert_eq!(purse.gp, 2.0);
        assert_eq!(purse.ep, 1.0);
        assert_eq!(purse.sp, 0.0);
        assert_eq!(purse.cp, 5.0);
    }

    #[test]
    fn exchange_adds_into_target() {
        let purse = engine().exchange(10.0, Sp, gp(3.0), None);
        assert_eq!(purse.gp, 4.0);
    }

    #[test]
    fn shares_and_remainder_peculiarity() {
        let purse = CurrencyAmount {
            gp: 10.0,
            sp: 7.0,
            ..CurrencyAmount::default()
        };
        let (shares, remainder) = engine().shares_and_remainder(&purse, 3).unwrap();
        assert_eq!(shares.gp, 3.0);
        assert_eq!(shares.sp, 2.0);
        // remainder is share % split
        assert_eq!(remainder.gp, 0.0);
        assert_eq!(remainder.sp, 2.0);
    }

    #[test]
    fn zero_split_is_error() {
        assert_eq!(
            engine().shares_and_remainder(&gp(5.0), 0),
            Err(CurrencyError::InvalidSplit(0))
        );
    }

    #[test]
    fn buy_with_exact_gold() {
        for engine in [engine(), convert_engine()] {
            let mut buyer = gp(10.0);
            let mut seller = CurrencyAmount::blank();
            let mut notices = Notices::new();
            assert!(engine.update_funds(&mut seller, &mut buyer, 5.0, &mut notices));
            assert_eq!(buyer, gp(5.0));
            assert_eq!(seller, gp(5.0));
        }
    }

    #[test]
    fn empty_purse_cannot_buy() {
        let mut buyer = CurrencyAmount::blank();
        let mut seller = gp(2.0);
        let mut notices = Notices::new();
        assert!(!engine().update_funds(&mut seller, &mut buyer, 0.5, &mut notices));
        assert!(buyer.is_empty());
        assert_eq!(seller, gp(2.0));
        assert!(notices.contains("insufficient funds"));
    }

    #[test]
    fn smooth_mode_borrows_from_lower_coins() {
        let mut buyer = CurrencyAmount::of(Cp, 1000.0);
        let mut seller = CurrencyAmount::blank();
        let mut notices = Notices::new();
        assert!(engine().update_funds(&mut seller, &mut buyer, 5.0, &mut notices));
        assert_eq!(buyer, CurrencyAmount::of(Cp, 500.0));
    }

    #[test]
    fn smooth_mode_breaks_platinum() {
        let mut buyer = CurrencyAmount::of(Pp, 1.0);
        let mut seller = CurrencyAmount::blank();
        let mut notices = Notices::new();
        assert!(engine().update_funds(&mut seller, &mut buyer, 2.5, &mut notices));
        assert_eq!(buyer.pp, 0.0);
        assert_eq!(buyer.gp, 7.0);
        assert_eq!(buyer.ep, 1.0);
        assert_eq!(seller.gp, 2.0);
        assert_eq!(seller.ep, 1.0);
    }

    #[test]
    fn convert_mode_collapses_purse() {
        let mut buyer = CurrencyAmount {
            gp: 3.0,
            sp: 50.0,
            ..CurrencyAmount::default()
        };
        let mut seller = CurrencyAmount::blank();
        let mut notices = Notices::new();
        assert!(convert_engine().update_funds(&mut seller, &mut buyer, 1.0, &mut notices));
        assert_eq!(buyer, gp(7.0));
    }

    #[test]
    fn smooth_resolves_float_drift() {
        let mut purse = CurrencyAmount {
            gp: 15.999_999_999,
            ..CurrencyAmount::default()
        };
        engine().smooth(&mut purse);
        assert_eq!(purse, gp(16.0));
    }

    #[test]
    fn merge_sums() {
        let merged = engine().merge(&gp(2.0), &CurrencyAmount::of(Sp, 4.0));
        assert_eq!(merged.gp, 2.0);
        assert_eq!(merged.sp, 4.0);
    }

    fn purse_strategy() -> impl Strategy<Value = CurrencyAmount> {
        (0u32..50, 0u32..200, 0u32..20, 0u32..200, 0u32..500).prop_map(|(pp, gp, ep, sp, cp)| {
            CurrencyAmount {
                pp: f64::from(pp),
                gp: f64::from(gp),
                ep: f64::from(ep),
                sp: f64::from(sp),
                cp: f64::from(cp),
            }
        })
    }

    proptest! {
        #[test]
        fn generated_currency_is_whole_and_non_negative(
            dice in 1u32..6, sides in 1u32..100, offset in -50i32..50, denom in 0usize..5,
        ) {
            let symbol = Denomination::ALL[denom].symbol();
            let formula = format!("{dice}d{sides} + {offset}[{symbol}], 1d4[gp]");
            let mut roller = Roller::new(u64::from(sides));
            let mut notices = Notices::new();
            let purse = engine().generate_currency(
                &formula, &mut roller, &mut notices, &FormulaContext::new());
            prop_assert!(notices.is_empty());
            for (_, value) in purse.iter() {
                prop_assert!(value >= 0.0);
                prop_assert_eq!(value.fract(), 0.0);
            }
        }

        #[test]
        fn exchange_copper_resums(amount in 0u32..1_000_000) {
            let purse = engine().exchange(f64::from(amount), Cp, CurrencyAmount::blank(), None);
            prop_assert_eq!(engine().to_lowest(&purse).round(), f64::from(amount));
            for (d, value) in purse.iter() {
                if d != Denomination::lowest() {
                    prop_assert_eq!(value.fract(), 0.0);
                }
            }
        }

        #[test]
        fn update_funds_never_negative(
            buyer in purse_strategy(), seller in purse_strategy(), cost in 0u32..3000,
            convert in any::<bool>(),
        ) {
            let engine = if convert { convert_engine() } else { engine() };
            let cost = f64::from(cost) / 10.0;
            let (mut b, mut s) = (buyer, seller);
            let mut notices = Notices::new();
            let ok = engine.update_funds(&mut s, &mut b, cost, &mut notices);
            if ok {
                prop_assert!(!b.has_negative());
                prop_assert!(!s.has_negative());
                for d in [Pp, Gp, Ep, Sp] {
                    prop_assert_eq!(b[d].fract(), 0.0);
                    prop_assert_eq!(s[d].fract(), 0.0);
                }
                let before = engine.to_base(&buyer);
                let after = engine.to_base(&b);
                prop_assert!((before - cost - after).abs() < 0.01);
            } else {
                prop_assert_eq!(b, buyer);
                prop_assert_eq!(s, seller);
            }
        }
    }
}
