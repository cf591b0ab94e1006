//! Error types for dice formulas.

/// Errors that can occur while parsing or evaluating a dice formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiceError {
    /// The formula was empty or whitespace.
    #[error("empty formula")]
    Empty,

    /// The lexer hit a character it does not understand.
    #[error("unexpected character {text:?} at {position}")]
    Lex {
        /// Byte offset of the bad input.
        position: usize,
        /// The offending text.
        text: String,
    },

    /// The parser found a token where it expected something else.
    #[error("unexpected {found} at {position}, expected {expected}")]
    UnexpectedToken {
        /// Byte offset of the token.
        position: usize,
        /// The token that was found.
        found: String,
        /// What the parser wanted.
        expected: &'static str,
    },

    /// The formula ended too early.
    #[error("unexpected end of formula, expected {0}")]
    UnexpectedEnd(&'static str),

    /// A function name that is not supported.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A function was called with the wrong number of arguments.
    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        /// Function name.
        name: String,
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        got: usize,
    },

    /// A die with fewer than one side, or a malformed `NdM` term.
    #[error("invalid die: {0}")]
    InvalidDie(String),

    /// More dice than the roller is willing to throw at once.
    #[error("too many dice: {0}")]
    TooManyDice(u64),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
