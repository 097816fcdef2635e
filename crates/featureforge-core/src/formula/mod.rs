//! Propositional formulas over feature names.
//!
//! [`Formula`] is the term representation shared by constraints and the
//! lowering pass. Besides the classic connectives it carries cardinality
//! nodes (`atleast`, `atmost`, `between`, `choose`) so group semantics can be
//! expressed without expanding them into clauses.

mod parser;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::fmt;

pub use parser::FormulaParseError;

/// A propositional formula.
///
/// # Example
///
/// ```
/// use featureforge_core::formula::Formula;
///
/// let f = Formula::implies(Formula::literal("Radio"), Formula::literal("Car"));
/// assert_eq!(f.to_string(), "Radio => Car");
/// assert_eq!(Formula::parse("Radio => Car").unwrap(), f);
/// assert_eq!(f.variables(), vec!["Radio", "Car"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    True,
    False,
    Literal(String),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    BiImplies(Box<Formula>, Box<Formula>),
    /// At least `k` operands hold.
    AtLeast(usize, Vec<Formula>),
    /// At most `k` operands hold.
    AtMost(usize, Vec<Formula>),
    /// Between `min` and `max` operands hold (inclusive).
    Between(usize, usize, Vec<Formula>),
    /// Exactly `k` operands hold.
    Choose(usize, Vec<Formula>),
}

impl Formula {
    pub fn literal(name: impl Into<String>) -> Self {
        Formula::Literal(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Formula) -> Self {
        Formula::Not(Box::new(operand))
    }

    pub fn and(operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::And(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::Or(operands.into_iter().collect())
    }

    pub fn implies(premise: Formula, conclusion: Formula) -> Self {
        Formula::Implies(Box::new(premise), Box::new(conclusion))
    }

    pub fn bi_implies(left: Formula, right: Formula) -> Self {
        Formula::BiImplies(Box::new(left), Box::new(right))
    }

    pub fn at_least(k: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::AtLeast(k, operands.into_iter().collect())
    }

    pub fn at_most(k: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::AtMost(k, operands.into_iter().collect())
    }

    pub fn between(min: usize, max: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::Between(min, max, operands.into_iter().collect())
    }

    pub fn choose(k: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::Choose(k, operands.into_iter().collect())
    }

    /// Parses the infix text syntax produced by `Display`.
    pub fn parse(text: &str) -> Result<Formula, FormulaParseError> {
        parser::parse(text)
    }

    /// Returns the direct operands of this node.
    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::True | Formula::False | Formula::Literal(_) => Vec::new(),
            Formula::Not(f) => vec![f],
            Formula::Implies(a, b) | Formula::BiImplies(a, b) => vec![a, b],
            Formula::And(ops)
            | Formula::Or(ops)
            | Formula::AtLeast(_, ops)
            | Formula::AtMost(_, ops)
            | Formula::Between(_, _, ops)
            | Formula::Choose(_, ops) => ops.iter().collect(),
        }
    }

    /// Returns the distinct variable names in first-occurrence order.
    pub fn variables(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        self.collect_variables(&mut seen, &mut out);
        out
    }

    fn collect_variables<'a>(&'a self, seen: &mut BTreeSet<&'a str>, out: &mut Vec<&'a str>) {
        if let Formula::Literal(name) = self {
            if seen.insert(name.as_str()) {
                out.push(name.as_str());
            }
            return;
        }
        for child in self.children() {
            child.collect_variables(seen, out);
        }
    }

    /// Renames every literal `from` to `to`, returning how many were rewritten.
    pub fn rename_variable(&mut self, from: &str, to: &str) -> usize {
        match self {
            Formula::True | Formula::False => 0,
            Formula::Literal(name) => {
                if name == from {
                    *name = to.to_string();
                    1
                } else {
                    0
                }
            }
            Formula::Not(f) => f.rename_variable(from, to),
            Formula::Implies(a, b) | Formula::BiImplies(a, b) => {
                a.rename_variable(from, to) + b.rename_variable(from, to)
            }
            Formula::And(ops)
            | Formula::Or(ops)
            | Formula::AtLeast(_, ops)
            | Formula::AtMost(_, ops)
            | Formula::Between(_, _, ops)
            | Formula::Choose(_, ops) => ops.iter_mut().map(|f| f.rename_variable(from, to)).sum(),
        }
    }

    /// Evaluates the formula under a total assignment.
    ///
    /// Returns `None` if a variable is not assigned.
    pub fn evaluate(&self, assignment: &impl Fn(&str) -> Option<bool>) -> Option<bool> {
        let count = |ops: &[Formula]| -> Option<usize> {
            let mut n = 0;
            for op in ops {
                if op.evaluate(assignment)? {
                    n += 1;
                }
            }
            Some(n)
        };
        Some(match self {
            Formula::True => true,
            Formula::False => false,
            Formula::Literal(name) => assignment(name)?,
            Formula::Not(f) => !f.evaluate(assignment)?,
            Formula::And(ops) => count(ops)? == ops.len(),
            Formula::Or(ops) => count(ops)? > 0,
            Formula::Implies(a, b) => !a.evaluate(assignment)? || b.evaluate(assignment)?,
            Formula::BiImplies(a, b) => a.evaluate(assignment)? == b.evaluate(assignment)?,
            Formula::AtLeast(k, ops) => count(ops)? >= *k,
            Formula::AtMost(k, ops) => count(ops)? <= *k,
            Formula::Between(min, max, ops) => {
                let n = count(ops)?;
                n >= *min && n <= *max
            }
            Formula::Choose(k, ops) => count(ops)? == *k,
        })
    }

    /// Operator precedence used by the printer; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Formula::BiImplies(..) => 1,
            Formula::Implies(..) => 2,
            Formula::Or(ops) if ops.len() > 1 => 3,
            Formula::And(ops) if ops.len() > 1 => 4,
            _ => 5,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() <= parent && self.precedence() < 5 {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    fn fmt_joined(f: &mut fmt::Formatter<'_>, ops: &[Formula], sep: &str, prec: u8) -> fmt::Result {
        for (i, op) in ops.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            op.fmt_operand(f, prec)?;
        }
        Ok(())
    }

    fn fmt_call(f: &mut fmt::Formatter<'_>, name: &str, bounds: &[usize], ops: &[Formula]) -> fmt::Result {
        write!(f, "{name}(")?;
        for (i, b) in bounds.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{b}")?;
        }
        for op in ops {
            write!(f, ", {op}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => f.write_str("true"),
            Formula::False => f.write_str("false"),
            Formula::Literal(name) => write_name(f, name),
            Formula::Not(op) => {
                f.write_str("!")?;
                op.fmt_operand(f, 4)
            }
            Formula::And(ops) if ops.is_empty() => f.write_str("true"),
            Formula::Or(ops) if ops.is_empty() => f.write_str("false"),
            Formula::And(ops) => Self::fmt_joined(f, ops, " & ", 4),
            Formula::Or(ops) => Self::fmt_joined(f, ops, " | ", 3),
            Formula::Implies(a, b) => {
                a.fmt_operand(f, 2)?;
                f.write_str(" => ")?;
                b.fmt_operand(f, 2)
            }
            Formula::BiImplies(a, b) => {
                a.fmt_operand(f, 1)?;
                f.write_str(" <=> ")?;
                b.fmt_operand(f, 1)
            }
            Formula::AtLeast(k, ops) => Self::fmt_call(f, "atleast", &[*k], ops),
            Formula::AtMost(k, ops) => Self::fmt_call(f, "atmost", &[*k], ops),
            Formula::Between(min, max, ops) => Self::fmt_call(f, "between", &[*min, *max], ops),
            Formula::Choose(k, ops) => Self::fmt_call(f, "choose", &[*k], ops),
        }
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if parser::is_bare_name(name) {
        f.write_str(name)
    } else {
        write!(f, "\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
