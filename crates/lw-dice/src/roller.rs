//! The seeded random generator that evaluates formulas.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lw_core::FormulaContext;

use crate::die::DieResult;
use crate::error::DiceResult;
use crate::expr::parse;

/// The outcome of evaluating a formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The formula's numeric value.
    pub total: f64,
    /// Every die thrown, in evaluation order.
    pub rolls: Vec<DieResult>,
}

/// Evaluates dice formulas with a seeded RNG.
#[derive(Debug, Clone)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    /// Create a roller with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a roller seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Wrap an existing RNG.
    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Parse and evaluate a formula, surfacing any failure.
    pub fn evaluate(&mut self, formula: &str, context: &FormulaContext) -> DiceResult<Evaluation> {
        let expr = parse(formula)?;
        let mut rolls = Vec::new();
        let total = expr.evaluate(&mut self.rng, context, &mut rolls)?;
        Ok(Evaluation { total, rolls })
    }

    /// Roll a formula and return its integer value (rounded down).
    ///
    /// A malformed formula yields 1 and logs a warning.
    pub fn roll_formula(&mut self, formula: &str, context: &FormulaContext) -> i64 {
        match self.evaluate(formula, context) {
            Ok(evaluation) if evaluation.total.is_finite() => evaluation.total.floor() as i64,
            Ok(evaluation) => {
                tracing::warn!("formula {formula:?} produced {}, using 1", evaluation.total);
                1
            }
            Err(e) => {
                tracing::warn!("could not roll {formula:?}: {e}, using 1");
                1
            }
        }
    }

    /// Roll a formula without any data references.
    pub fn roll(&mut self, formula: &str) -> i64 {
        self.roll_formula(formula, &FormulaContext::new())
    }

    /// A uniform integer in `range`.
    pub fn random_range(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.random_range(range)
    }

    /// Direct access to the underlying RNG.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for Roller {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiceError;
    use lw_core::MetadataValue;

    #[test]
    fn same_seed_same_rolls() {
        let mut a = Roller::new(42);
        let mut b = Roller::new(42);
        for _ in 0..20 {
            assert_eq!(a.roll("3d6 + 2"), b.roll("3d6 + 2"));
        }
    }

    #[test]
    fn roll_formula_floors() {
        let mut roller = Roller::new(1);
        assert_eq!(roller.roll("7 / 2"), 3);
        assert_eq!(roller.roll("-1 / 2"), -1);
    }

    #[test]
    fn malformed_formula_defaults_to_one() {
        let mut roller = Roller::new(1);
        assert_eq!(roller.roll("2d6 +"), 1);
        assert_eq!(roller.roll("banana"), 1);
        assert_eq!(roller.roll(""), 1);
        assert_eq!(roller.roll("1 / 0"), 1);
    }

    #[test]
    fn evaluate_reports_errors() {
        let mut roller = Roller::new(1);
        assert_eq!(
            roller.evaluate("", &FormulaContext::new()),
            Err(DiceError::Empty)
        );
    }

    #[test]
    fn evaluate_records_dice() {
        let mut roller = Roller::new(5);
        let evaluation = roller.evaluate("2d8 + 1d4", &FormulaContext::new()).unwrap();
        assert_eq!(evaluation.rolls.len(), 3);
        let sum: u32 = evaluation.rolls.iter().map(|r| r.value).sum();
        assert_eq!(evaluation.total, f64::from(sum));
    }

    #[test]
    fn context_reference() {
        let mut ctx = FormulaContext::new();
        ctx.insert("cr".to_string(), MetadataValue::Integer(3));
        let mut roller = Roller::new(1);
        assert_eq!(roller.roll_formula("@cr * 10", &ctx), 30);
    }

    #[test]
    fn random_range_bounds() {
        let mut roller = Roller::new(3);
        for _ in 0..100 {
            let v = roller.random_range(1..=10);
            assert!((1..=10).contains(&v));
        }
    }
}
