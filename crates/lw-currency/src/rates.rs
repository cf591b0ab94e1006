//! Exchange rates between denominations.

use std::fmt;

use serde::{Deserialize, Serialize};

use lw_core::Denomination;

use crate::error::{CurrencyError, CurrencyResult};

/// An exact fraction `num / den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    /// Numerator.
    pub num: u32,
    /// Denominator.
    pub den: u32,
}

impl Ratio {
    /// Build a ratio.
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// A whole-number ratio `n / 1`.
    pub const fn whole(n: u32) -> Self {
        Self { num: n, den: 1 }
    }

    /// The ratio as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    fn is_valid(self) -> bool {
        self.num != 0 && self.den != 0
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// How many units of each denomination make up one base unit.
///
/// The defaults are the standard chain: 1pp = 10gp, 1gp = 2ep = 10sp = 100cp.
/// Because every rate is derived from a per-base ratio,
/// `rate(a, b) * rate(b, c) == rate(a, c)` and `rate(a, a) == 1` hold for any
/// valid table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRates {
    /// The denomination amounts are valued in.
    pub base: Denomination,
    /// Platinum per base unit.
    pub pp: Ratio,
    /// Gold per base unit.
    pub gp: Ratio,
    /// Electrum per base unit.
    pub ep: Ratio,
    /// Silver per base unit.
    pub sp: Ratio,
    /// Copper per base unit.
    pub cp: Ratio,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            base: Denomination::Gp,
            pp: Ratio::new(1, 10),
            gp: Ratio::whole(1),
            ep: Ratio::whole(2),
            sp: Ratio::whole(10),
            cp: Ratio::whole(100),
        }
    }
}

impl ExchangeRates {
    /// Check every ratio is non-zero and the base is worth exactly one unit.
    pub fn validate(&self) -> CurrencyResult<()> {
        for denomination in Denomination::ALL {
            if !self.conversion(denomination).is_valid() {
                return Err(CurrencyError::InvalidRate(denomination));
            }
        }
        let base = self.conversion(self.base);
        if base.num != base.den {
            return Err(CurrencyError::InvalidBase(self.base));
        }
        Ok(())
    }

    /// Units of `denomination` per base unit, as an exact fraction.
    pub fn conversion(&self, denomination: Denomination) -> Ratio {
        match denomination {
            Denomination::Pp => self.pp,
            Denomination::Gp => self.gp,
            Denomination::Ep => self.ep,
            Denomination::Sp => self.sp,
            Denomination::Cp => self.cp,
        }
    }

    /// Units of `to` worth one unit of `from`, as an exact fraction.
    pub fn ratio(&self, from: Denomination, to: Denomination) -> Ratio {
        let f = self.conversion(from);
        let t = self.conversion(to);
        let num = u64::from(t.num) * u64::from(f.den);
        let den = u64::from(t.den) * u64::from(f.num);
        let g = gcd(num, den);
        Ratio {
            num: u32::try_from(num / g).unwrap_or(u32::MAX),
            den: u32::try_from(den / g).unwrap_or(u32::MAX),
        }
    }

    /// Units of `to` worth one unit of `from`.
    pub fn rate(&self, from: Denomination, to: Denomination) -> f64 {
        let f = self.conversion(from);
        let t = self.conversion(to);
        (f64::from(t.num) * f64::from(f.den)) / (f64::from(t.den) * f64::from(f.num))
    }

    /// The base denomination.
    pub fn base(&self) -> Denomination {
        self.base
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}
