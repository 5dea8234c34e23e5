//! Arithmetic-only expression evaluator backing the `calculate` tool.
//!
//! Input is first checked against a character allow-list, then tokenized and
//! parsed by a small recursive-descent parser. Only numeric literals,
//! `+ - * / // **` and parentheses exist in the grammar, so no input can do
//! anything other than arithmetic.
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/' | '//') unary)*
//! unary := ('+' | '-') unary | power
//! power := atom ('**' unary)?
//! atom  := NUMBER | '(' expr ')'
//! ```
//!
//! Integers and reals are kept apart: `+ - * // **` on integers stay
//! integral (promoting to real on overflow) while `/` always yields a real.

use super::{ParamType, Tool, ToolDescriptor, ToolParameter};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

const ALLOWED_CHARS: &str = "0123456789+-*/(). ";
const MAX_DEPTH: usize = 200;

pub const INVALID_CHARS_MESSAGE: &str =
    "Error: Invalid characters in expression. Only numbers and basic operators allowed.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("invalid number at position {0}")]
    InvalidNumber(usize),

    #[error("leading zeros in decimal integer literals are not permitted")]
    LeadingZeros,

    #[error("unexpected '{token}' at position {pos}")]
    UnexpectedToken { token: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("'(' was never closed")]
    UnclosedParen,

    #[error("unmatched ')'")]
    UnmatchedParen,

    #[error("expression is nested too deeply")]
    TooDeep,

    #[error("division by zero")]
    DivisionByZero,

    #[error("zero cannot be raised to a negative power")]
    ZeroNegativePower,

    #[error("result is not a real number")]
    NotReal,

    #[error("numerical result out of range")]
    OutOfRange,
}

/// Result of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Real(r) => r,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Real(r) => r == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Real(r) => f.write_str(&format_real(r)),
        }
    }
}

/// Shortest round-trip form, always showing it is a real (`4.0`, `2.5`,
/// `1e+16`, `1e-05`).
fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    LParen,
    RParen,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::DoubleStar => "**".to_string(),
            Token::Slash => "/".to_string(),
            Token::DoubleSlash => "//".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, CalcError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let token = match bytes[pos] {
            b' ' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 1;
                Token::DoubleStar
            }
            b'*' => Token::Star,
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos += 1;
                Token::DoubleSlash
            }
            b'/' => Token::Slash,
            b'0'..=b'9' | b'.' => {
                let (number, end) = lex_number(input, pos)?;
                tokens.push((Token::Num(number), start));
                pos = end;
                continue;
            }
            other => {
                return Err(CalcError::UnexpectedToken {
                    token: (other as char).to_string(),
                    pos,
                })
            }
        };
        tokens.push((token, start));
        pos += 1;
    }

    Ok(tokens)
}

fn lex_number(input: &str, start: usize) -> Result<(Number, usize), CalcError> {
    let bytes = input.as_bytes();
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - start;

    let mut is_real = false;
    if end < bytes.len() && bytes[end] == b'.' {
        is_real = true;
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let literal = &input[start..end];
    // A lone '.' has no digits on either side
    if int_digits == 0 && literal.len() == 1 {
        return Err(CalcError::InvalidNumber(start));
    }

    if is_real {
        let value: f64 = literal
            .parse()
            .map_err(|_| CalcError::InvalidNumber(start))?;
        return Ok((real(value)?, end));
    }

    if literal.len() > 1 && literal.starts_with('0') && literal.bytes().any(|b| b != b'0') {
        return Err(CalcError::LeadingZeros);
    }

    let number = match literal.parse::<i64>() {
        Ok(value) => Number::Int(value),
        Err(_) => real(
            literal
                .parse()
                .map_err(|_| CalcError::InvalidNumber(start))?,
        )?,
    };
    Ok((number, end))
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self) -> CalcError {
        match self.tokens.get(self.pos) {
            Some((Token::RParen, _)) => CalcError::UnmatchedParen,
            Some((token, pos)) => CalcError::UnexpectedToken {
                token: token.text(),
                pos: *pos,
            },
            None => CalcError::UnexpectedEnd,
        }
    }

    fn parse(mut self) -> Result<Number, CalcError> {
        if self.tokens.is_empty() {
            return Err(CalcError::Empty);
        }
        let value = self.expr()?;
        if self.peek().is_some() {
            return Err(self.unexpected());
        }
        Ok(value)
    }

    fn expr(&mut self) -> Result<Number, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value = add(value, self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value = sub(value, self.term()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Number, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value = mul(value, self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    value = div(value, self.unary()?)?;
                }
                Some(Token::DoubleSlash) => {
                    self.advance();
                    value = floor_div(value, self.unary()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Number, CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }

        let result = match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            Some(Token::Minus) => {
                self.advance();
                self.unary().and_then(neg)
            }
            _ => self.power(),
        };

        self.depth -= 1;
        result
    }

    fn power(&mut self) -> Result<Number, CalcError> {
        let base = self.atom()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.advance();
            let exponent = self.unary()?;
            return pow(base, exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Number, CalcError> {
        match self.peek() {
            Some(Token::Num(number)) => {
                self.advance();
                Ok(number)
            }
            Some(Token::LParen) => {
                self.advance();
                let value = self.expr()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.advance();
                        Ok(value)
                    }
                    None => Err(CalcError::UnclosedParen),
                    Some(_) => Err(self.unexpected()),
                }
            }
            _ => Err(self.unexpected()),
        }
    }
}

fn real(value: f64) -> Result<Number, CalcError> {
    if value.is_finite() {
        Ok(Number::Real(value))
    } else {
        Err(CalcError::OutOfRange)
    }
}

fn add(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_add(y) {
            Some(v) => Ok(Number::Int(v)),
            None => real(x as f64 + y as f64),
        },
        _ => real(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_sub(y) {
            Some(v) => Ok(Number::Int(v)),
            None => real(x as f64 - y as f64),
        },
        _ => real(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_mul(y) {
            Some(v) => Ok(Number::Int(v)),
            None => real(x as f64 * y as f64),
        },
        _ => real(a.as_f64() * b.as_f64()),
    }
}

fn div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    real(a.as_f64() / b.as_f64())
}

fn floor_div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_div(y) {
            Some(q) if x % y != 0 && ((x < 0) != (y < 0)) => Ok(Number::Int(q - 1)),
            Some(q) => Ok(Number::Int(q)),
            None => real((x as f64 / y as f64).floor()),
        },
        _ => real((a.as_f64() / b.as_f64()).floor()),
    }
}

fn neg(a: Number) -> Result<Number, CalcError> {
    match a {
        Number::Int(x) => match x.checked_neg() {
            Some(v) => Ok(Number::Int(v)),
            None => real(-(x as f64)),
        },
        Number::Real(r) => Ok(Number::Real(-r)),
    }
}

fn pow(base: Number, exponent: Number) -> Result<Number, CalcError> {
    if base.is_zero() && exponent.as_f64() < 0.0 {
        return Err(CalcError::ZeroNegativePower);
    }

    if let (Number::Int(b), Number::Int(e)) = (base, exponent) {
        if e >= 0 {
            if let Some(v) = u32::try_from(e).ok().and_then(|e| b.checked_pow(e)) {
                return Ok(Number::Int(v));
            }
        }
    }

    let (b, e) = (base.as_f64(), exponent.as_f64());
    if b < 0.0 && e.fract() != 0.0 {
        return Err(CalcError::NotReal);
    }
    real(b.powf(e))
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<Number, CalcError> {
    let tokens = tokenize(expression)?;
    Parser {
        tokens,
        pos: 0,
        depth: 0,
    }
    .parse()
}

/// Evaluate `expression` and render the result or an `Error: ...` message.
///
/// Never panics and never raises: every failure comes back as text.
pub fn calculate(expression: &str) -> String {
    if !expression.chars().all(|c| ALLOWED_CHARS.contains(c)) {
        return INVALID_CHARS_MESSAGE.to_string();
    }

    match evaluate(expression) {
        Ok(value) => value.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "calculate".to_string(),
            description: "Evaluate a mathematical expression safely.".to_string(),
            parameters: vec![ToolParameter {
                name: "expression".to_string(),
                kind: ParamType::String,
                description: "A mathematical expression to evaluate (e.g., \"2 + 2 * 3\")."
                    .to_string(),
                required: true,
            }],
            returns: "The result of the calculation as a string.".to_string(),
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> String {
        match args.get("expression").and_then(Value::as_str) {
            Some(expression) => calculate(expression),
            None => "Error: missing string argument 'expression'".to_string(),
        }
    }
}
