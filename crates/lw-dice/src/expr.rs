//! Dice formula syntax tree, recursive-descent parser, and evaluator.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | NdM | @path | IDENT '(' expr (',' expr)* ')' | '(' expr ')'
//! ```

use std::fmt;
use std::ops::Range;

use rand::rngs::StdRng;

use lw_core::FormulaContext;
use lw_core::metadata::lookup_path;

use crate::die::{Die, DieResult};
use crate::error::{DiceError, DiceResult};
use crate::lexer::{Token, lex};

/// Upper bound on dice thrown by a single `NdM` term.
pub const MAX_DICE: u64 = 10_000;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
        }
    }
}

/// A supported function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Round down.
    Floor,
    /// Round up.
    Ceil,
    /// Round to nearest.
    Round,
    /// Absolute value.
    Abs,
    /// Smallest argument.
    Min,
    /// Largest argument.
    Max,
}

impl Function {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "floor" => Some(Self::Floor),
            "ceil" => Some(Self::Ceil),
            "round" => Some(Self::Round),
            "abs" => Some(Self::Abs),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Exact argument count, or `None` for variadic functions.
    fn arity(self) -> Option<usize> {
        match self {
            Self::Floor | Self::Ceil | Self::Round | Self::Abs => Some(1),
            Self::Min | Self::Max => None,
        }
    }
}

/// A parsed dice formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(f64),
    /// `count` dice of one type.
    Dice {
        /// Number of dice.
        count: u64,
        /// The die to roll.
        die: Die,
    },
    /// A reference into the formula context.
    Reference(String),
    /// Unary negation.
    Neg(Box<Expr>),
    /// A binary operation.
    Binary {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// A function call.
    Call {
        /// Function.
        function: Function,
        /// Arguments.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Evaluate the expression, rolling dice with `rng` and resolving
    /// references against `context`. Every die thrown is appended to `rolls`.
    ///
    /// Missing references evaluate to 0.
    pub fn evaluate(
        &self,
        rng: &mut StdRng,
        context: &FormulaContext,
        rolls: &mut Vec<DieResult>,
    ) -> DiceResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Dice { count, die } => {
                let mut total = 0u64;
                for _ in 0..*count {
                    let result = die.roll(rng);
                    total += u64::from(result.value);
                    rolls.push(result);
                }
                Ok(total as f64)
            }
            Self::Reference(path) => match lookup_path(context, path).and_then(|v| v.as_f64()) {
                Some(value) => Ok(value),
                None => {
                    tracing::debug!("formula reference @{path} not found, using 0");
                    Ok(0.0)
                }
            },
            Self::Neg(inner) => Ok(-inner.evaluate(rng, context, rolls)?),
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate(rng, context, rolls)?;
                let r = rhs.evaluate(rng, context, rolls)?;
                match op {
                    BinOp::Add => Ok(l + r),
                    BinOp::Sub => Ok(l - r),
                    BinOp::Mul => Ok(l * r),
                    BinOp::Div if r == 0.0 => Err(DiceError::DivisionByZero),
                    BinOp::Div => Ok(l / r),
                }
            }
            Self::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|a| a.evaluate(rng, context, rolls))
                    .collect::<DiceResult<Vec<f64>>>()?;
                let first = values.first().copied().unwrap_or(0.0);
                Ok(match function {
                    Function::Floor => first.floor(),
                    Function::Ceil => first.ceil(),
                    Function::Round => first.round(),
                    Function::Abs => first.abs(),
                    Function::Min => values.into_iter().fold(f64::INFINITY, f64::min),
                    Function::Max => values.into_iter().fold(f64::NEG_INFINITY, f64::max),
                })
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Dice { count, die } => write!(f, "{count}{die}"),
            Self::Reference(path) => write!(f, "@{path}"),
            Self::Neg(inner) => write!(f, "-{inner}"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Self::Call { function, args } => {
                let parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function.name(), parts.join(", "))
            }
        }
    }
}

/// Parse a formula into an expression tree.
pub fn parse(source: &str) -> DiceResult<Expr> {
    if source.trim().is_empty() {
        return Err(DiceError::Empty);
    }
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if let Some((token, span)) = parser.tokens.get(parser.pos) {
        return Err(DiceError::UnexpectedToken {
            position: span.start,
            found: token.to_string(),
            expected: "operator or end of formula",
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<(Token, Range<usize>)> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn expect(&mut self, wanted: Token, expected: &'static str) -> DiceResult<()> {
        match self.advance() {
            Some((token, _)) if token == wanted => Ok(()),
            Some((token, span)) => Err(DiceError::UnexpectedToken {
                position: span.start,
                found: token.to_string(),
                expected,
            }),
            None => Err(DiceError::UnexpectedEnd(expected)),
        }
    }

    fn expr(&mut self) -> DiceResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> DiceResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> DiceResult<Expr> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.peek() == Some(&Token::Plus) {
            self.pos += 1;
        }
        self.primary()
    }

    fn primary(&mut self) -> DiceResult<Expr> {
        let Some((token, span)) = self.advance() else {
            return Err(DiceError::UnexpectedEnd("a number, dice, or '('"));
        };

        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Dice { count, sides } => {
                if count > MAX_DICE {
                    return Err(DiceError::TooManyDice(count));
                }
                let die = u32::try_from(sides)
                    .ok()
                    .and_then(Die::with_sides)
                    .ok_or_else(|| DiceError::InvalidDie(format!("{count}d{sides}")))?;
                Ok(Expr::Dice { count, die })
            }
            Token::Reference(path) => Ok(Expr::Reference(path)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) => {
                let function =
                    Function::parse(&name).ok_or_else(|| DiceError::UnknownFunction(name.clone()))?;
                self.expect(Token::LParen, "'(' after function name")?;
                let mut args = vec![self.expr()?];
                while self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                    args.push(self.expr()?);
                }
                self.expect(Token::RParen, "')'")?;
                match function.arity() {
                    Some(expected) if expected != args.len() => Err(DiceError::Arity {
                        name,
                        expected,
                        got: args.len(),
                    }),
                    _ => Ok(Expr::Call { function, args }),
                }
            }
            other => Err(DiceError::UnexpectedToken {
                position: span.start,
                found: other.to_string(),
                expected: "a number, dice, or '('",
            }),
        }
    }
}
