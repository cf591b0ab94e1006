use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One of the five fixed coin denominations, ordered from highest to lowest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    /// Platinum pieces.
    Pp,
    /// Gold pieces.
    Gp,
    /// Electrum pieces.
    Ep,
    /// Silver pieces.
    Sp,
    /// Copper pieces.
    Cp,
}

impl Denomination {
    /// All denominations, highest value first.
    pub const ALL: [Self; 5] = [Self::Pp, Self::Gp, Self::Ep, Self::Sp, Self::Cp];

    /// The most valuable denomination.
    pub fn highest() -> Self {
        Self::Pp
    }

    /// The least valuable denomination.
    pub fn lowest() -> Self {
        Self::Cp
    }

    /// Position in the high-to-low chain.
    pub fn index(self) -> usize {
        match self {
            Self::Pp => 0,
            Self::Gp => 1,
            Self::Ep => 2,
            Self::Sp => 3,
            Self::Cp => 4,
        }
    }

    /// The next less valuable denomination, if any.
    pub fn next_lower(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The short symbol used in currency formulas (`"gp"`).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pp => "pp",
            Self::Gp => "gp",
            Self::Ep => "ep",
            Self::Sp => "sp",
            Self::Cp => "cp",
        }
    }

    /// Parse a denomination symbol, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pp" => Some(Self::Pp),
            "gp" => Some(Self::Gp),
            "ep" => Some(Self::Ep),
            "sp" => Some(Self::Sp),
            "cp" => Some(Self::Cp),
            _ => None,
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Coin holdings: a non-negative amount per denomination.
///
/// Only the lowest denomination may hold a fractional amount once an
/// exchange or smoothing pass has run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyAmount {
    /// Platinum pieces.
    pub pp: f64,
    /// Gold pieces.
    pub gp: f64,
    /// Electrum pieces.
    pub ep: f64,
    /// Silver pieces.
    pub sp: f64,
    /// Copper pieces.
    pub cp: f64,
}

impl CurrencyAmount {
    /// An empty purse.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A purse holding `amount` of a single denomination.
    pub fn of(denomination: Denomination, amount: f64) -> Self {
        let mut purse = Self::default();
        purse[denomination] = amount;
        purse
    }

    /// Add `amount` of one denomination.
    pub fn add(&mut self, denomination: Denomination, amount: f64) {
        self[denomination] += amount;
    }

    /// Add every denomination of `other` into this purse.
    pub fn merge(&mut self, other: &CurrencyAmount) {
        for denomination in Denomination::ALL {
            self[denomination] += other[denomination];
        }
    }

    /// Iterate `(denomination, amount)` pairs, highest value first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, f64)> + '_ {
        Denomination::ALL.into_iter().map(|d| (d, self[d]))
    }

    /// Denominations holding a non-zero amount.
    pub fn non_zero(&self) -> impl Iterator<Item = (Denomination, f64)> + '_ {
        self.iter().filter(|(_, amount)| *amount != 0.0)
    }

    /// True if every denomination is zero.
    pub fn is_empty(&self) -> bool {
        self.non_zero().next().is_none()
    }

    /// True if any denomination is below zero.
    pub fn has_negative(&self) -> bool {
        self.iter().any(|(_, amount)| amount < 0.0)
    }
}

impl Index<Denomination> for CurrencyAmount {
    type Output = f64;

    fn index(&self, denomination: Denomination) -> &f64 {
        match denomination {
            Denomination::Pp => &self.pp,
            Denomination::Gp => &self.gp,
            Denomination::Ep => &self.ep,
            Denomination::Sp => &self.sp,
            Denomination::Cp => &self.cp,
        }
    }
}

impl IndexMut<Denomination> for CurrencyAmount {
    fn index_mut(&mut self, denomination: Denomination) -> &mut f64 {
        match denomination {
            Denomination::Pp => &mut self.pp,
            Denomination::Gp => &mut self.gp,
            Denomination::Ep => &mut self.ep,
            Denomination::Sp => &mut self.sp,
            Denomination::Cp => &mut self.cp,
        }
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .non_zero()
            .map(|(d, amount)| format!("{}{d}", format_amount(amount)))
            .collect();
        if parts.is_empty() {
            write!(f, "0gp")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// Format an amount without a trailing `.0`, keeping at most two decimals.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        let text = format!("{amount:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
