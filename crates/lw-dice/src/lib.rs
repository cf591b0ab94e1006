//! Dice formulas for Lootwright.
//!
//! Formulas such as `2d6+3`, `(1d4)*10`, or `1d20 + @abilities.str.mod` are
//! lexed with logos, parsed into an [`Expr`] tree, and evaluated by a seeded
//! [`Roller`]. Malformed input never panics: [`Roller::roll_formula`] falls
//! back to a safe default of 1 and logs a warning.

pub mod die;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod roller;

pub use die::{Die, DieResult};
pub use error::{DiceError, DiceResult};
pub use expr::{Expr, parse};
pub use roller::{Evaluation, Roller};
