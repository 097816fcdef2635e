//! Recursive-descent parser for the infix formula syntax.
//!
//! Precedence from loosest to tightest: `<=>`, `=>` (right-associative),
//! `|`, `&`, `!`. Cardinality nodes use call syntax, e.g. `choose(1, A, B)`.

use thiserror::Error;

use super::Formula;

/// Error produced when formula text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Formula parse error at offset {position}: {message}")]
pub struct FormulaParseError {
    /// Byte offset into the input.
    pub position: usize,
    pub message: String,
}

impl FormulaParseError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Quoted(String),
    Not,
    And,
    Or,
    Implies,
    BiImplies,
    LParen,
    RParen,
    Comma,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Returns true if `name` can be printed without quotes.
pub(super) fn is_bare_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char) && name != "true" && name != "false"
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, FormulaParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '!' => {
                chars.next();
                tokens.push((pos, Token::Not));
            }
            '&' => {
                chars.next();
                tokens.push((pos, Token::And));
            }
            '|' => {
                chars.next();
                tokens.push((pos, Token::Or));
            }
            '(' => {
                chars.next();
                tokens.push((pos, Token::LParen));
            }
            ')' => {
                chars.next();
                tokens.push((pos, Token::RParen));
            }
            ',' => {
                chars.next();
                tokens.push((pos, Token::Comma));
            }
            '=' => {
                chars.next();
                match chars.next() {
                    Some((_, '>')) => tokens.push((pos, Token::Implies)),
                    _ => return Err(FormulaParseError::new(pos, "expected '=>'")),
                }
            }
            '<' => {
                chars.next();
                let eq = chars.next();
                let gt = chars.next();
                match (eq, gt) {
                    (Some((_, '=')), Some((_, '>'))) => tokens.push((pos, Token::BiImplies)),
                    _ => return Err(FormulaParseError::new(pos, "expected '<=>'")),
                }
            }
            '"' => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => name.push(escaped),
                            None => return Err(FormulaParseError::new(pos, "unterminated string")),
                        },
                        Some((_, ch)) => name.push(ch),
                        None => return Err(FormulaParseError::new(pos, "unterminated string")),
                    }
                }
                tokens.push((pos, Token::Quoted(name)));
            }
            c if is_name_char(c) => {
                let mut name = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if !is_name_char(ch) {
                        break;
                    }
                    name.push(ch);
                    chars.next();
                }
                tokens.push((pos, Token::Name(name)));
            }
            other => {
                return Err(FormulaParseError::new(
                    pos,
                    format!("unexpected character '{other}'"),
                ))
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

pub(super) fn parse(text: &str) -> Result<Formula, FormulaParseError> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        end: text.len(),
    };
    let formula = parser.bi_implication()?;
    if let Some((offset, token)) = parser.tokens.get(parser.pos) {
        return Err(FormulaParseError::new(
            *offset,
            format!("unexpected trailing token {token:?}"),
        ));
    }
    Ok(formula)
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(o, _)| *o)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), FormulaParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(FormulaParseError::new(self.offset(), format!("expected {token:?}")))
        }
    }

    fn bi_implication(&mut self) -> Result<Formula, FormulaParseError> {
        let mut left = self.implication()?;
        while self.eat(&Token::BiImplies) {
            let right = self.implication()?;
            left = Formula::bi_implies(left, right);
        }
        Ok(left)
    }

    fn implication(&mut self) -> Result<Formula, FormulaParseError> {
        let left = self.disjunction()?;
        if self.eat(&Token::Implies) {
            let right = self.implication()?;
            return Ok(Formula::implies(left, right));
        }
        Ok(left)
    }

    fn disjunction(&mut self) -> Result<Formula, FormulaParseError> {
        let mut operands = vec![self.conjunction()?];
        while self.eat(&Token::Or) {
            operands.push(self.conjunction()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Formula::Or(operands)
        })
    }

    fn conjunction(&mut self) -> Result<Formula, FormulaParseError> {
        let mut operands = vec![self.unary()?];
        while self.eat(&Token::And) {
            operands.push(self.unary()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Formula::And(operands)
        })
    }

    fn unary(&mut self) -> Result<Formula, FormulaParseError> {
        if self.eat(&Token::Not) {
            return Ok(Formula::not(self.unary()?));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Formula, FormulaParseError> {
        let offset = self.offset();
        let Some(token) = self.tokens.get(self.pos).map(|(_, t)| t.clone()) else {
            return Err(FormulaParseError::new(offset, "unexpected end of input"));
        };
        self.pos += 1;
        match token {
            Token::LParen => {
                let inner = self.bi_implication()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Quoted(name) => Ok(Formula::Literal(name)),
            Token::Name(name) if self.peek() == Some(&Token::LParen) => self.call(&name, offset),
            Token::Name(name) => Ok(match name.as_str() {
                "true" => Formula::True,
                "false" => Formula::False,
                _ => Formula::Literal(name),
            }),
            other => Err(FormulaParseError::new(offset, format!("unexpected token {other:?}"))),
        }
    }

    fn call(&mut self, name: &str, offset: usize) -> Result<Formula, FormulaParseError> {
        let bounds = match name {
            "atleast" | "atmost" | "choose" => 1,
            "between" => 2,
            _ => return Err(FormulaParseError::new(offset, format!("unknown function '{name}'"))),
        };
        self.expect(&Token::LParen)?;

        let mut numbers = Vec::with_capacity(bounds);
        for i in 0..bounds {
            if i > 0 {
                self.expect(&Token::Comma)?;
            }
            let at = self.offset();
            match self.tokens.get(self.pos).map(|(_, t)| t) {
                Some(Token::Name(n)) => {
                    let value = n
                        .parse::<usize>()
                        .map_err(|_| FormulaParseError::new(at, format!("expected a number, got '{n}'")))?;
                    numbers.push(value);
                    self.pos += 1;
                }
                _ => return Err(FormulaParseError::new(at, "expected a number")),
            }
        }

        let mut operands = Vec::new();
        while self.eat(&Token::Comma) {
            operands.push(self.bi_implication()?);
        }
        self.expect(&Token::RParen)?;

        Ok(match name {
            "atleast" => Formula::AtLeast(numbers[0], operands),
            "atmost" => Formula::AtMost(numbers[0], operands),
            "choose" => Formula::Choose(numbers[0], operands),
            _ => Formula::Between(numbers[0], numbers[1], operands),
        })
    }
}
