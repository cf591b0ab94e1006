//! Tokenizer for dice formulas.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::{DiceError, DiceResult};

/// Token type for dice formulas.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),
    /// A dice term `NdM`. A missing count means one die.
    Dice {
        /// Number of dice.
        count: u64,
        /// Sides per die.
        sides: u64,
    },
    /// A data reference `@path.to.value` (without the `@`).
    Reference(String),
    /// A bare identifier (function name).
    Ident(String),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Dice { count, sides } => write!(f, "{count}d{sides}"),
            Token::Reference(path) => write!(f, "@{path}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Raw logos token, borrowing from the source. Converted to `Token` after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[0-9]*[dD][0-9]+")]
    Dice,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_.]*")]
    Reference,

    #[regex(r"[a-zA-Z_]+")]
    Ident,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,
}

/// Lex a formula into `(Token, Span)` pairs.
///
/// Stops at the first character that cannot start a token.
pub fn lex(source: &str) -> DiceResult<Vec<(Token, Range<usize>)>> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let Ok(raw) = result else {
            return Err(DiceError::Lex {
                position: span.start,
                text: slice.to_string(),
            });
        };

        let token = match raw {
            RawToken::Dice => parse_dice(slice)?,
            RawToken::Number => Token::Number(slice.parse().map_err(|_| DiceError::Lex {
                position: span.start,
                text: slice.to_string(),
            })?),
            RawToken::Reference => {
                Token::Reference(slice[1..].trim_end_matches('.').to_string())
            }
            RawToken::Ident => Token::Ident(slice.to_lowercase()),
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::Comma => Token::Comma,
        };
        tokens.push((token, span));
    }

    Ok(tokens)
}

/// Split `NdM` into count and sides.
fn parse_dice(slice: &str) -> DiceResult<Token> {
    let lower = slice.to_lowercase();
    let (count, sides) = lower
        .split_once('d')
        .ok_or_else(|| DiceError::InvalidDie(slice.to_string()))?;
    let count = if count.is_empty() {
        1
    } else {
        count
            .parse()
            .map_err(|_| DiceError::InvalidDie(slice.to_string()))?
    };
    let sides = sides
        .parse()
        .map_err(|_| DiceError::InvalidDie(slice.to_string()))?;
    Ok(Token::Dice { count, sides })
}
