//! Cardinality ranges and sibling groups.

use std::fmt;

use crate::error::{FeatureModelError, Result};

/// An inclusive cardinality range `[lower, upper]`; `upper == None` is unbounded.
///
/// # Example
///
/// ```
/// use featureforge_core::model::Range;
///
/// let r = Range::new(2, Some(3)).unwrap();
/// assert!(r.contains(2) && r.contains(3) && !r.contains(4));
/// assert_eq!(r.to_string(), "[2..3]");
/// assert_eq!(Range::AND.to_string(), "[0..*]");
/// assert!(Range::new(3, Some(2)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    lower: usize,
    upper: Option<usize>,
}

impl Range {
    /// `[0..*]`
    pub const AND: Range = Range { lower: 0, upper: None };
    /// `[1..*]`
    pub const OR: Range = Range { lower: 1, upper: None };
    /// `[1..1]`
    pub const ALTERNATIVE: Range = Range { lower: 1, upper: Some(1) };
    /// `[1..1]`, the range of a mandatory node.
    pub const MANDATORY: Range = Range { lower: 1, upper: Some(1) };
    /// `[0..1]`, the range of an optional node.
    pub const OPTIONAL: Range = Range { lower: 0, upper: Some(1) };

    /// Creates a range, rejecting `upper < lower`.
    pub fn new(lower: usize, upper: Option<usize>) -> Result<Self> {
        match upper {
            Some(u) if u < lower => Err(FeatureModelError::InvalidRange { lower, upper: u }),
            _ => Ok(Range { lower, upper }),
        }
    }

    /// Creates an exact range `[n..n]`.
    pub const fn exactly(n: usize) -> Self {
        Range {
            lower: n,
            upper: Some(n),
        }
    }

    #[inline]
    pub const fn lower(&self) -> usize {
        self.lower
    }

    #[inline]
    pub const fn upper(&self) -> Option<usize> {
        self.upper
    }

    #[inline]
    pub const fn is_unbounded(&self) -> bool {
        self.upper.is_none()
    }

    /// Returns true if `n` lies within the range.
    pub fn contains(&self, n: usize) -> bool {
        n >= self.lower && self.upper.map_or(true, |u| n <= u)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(u) => write!(f, "[{}..{}]", self.lower, u),
            None => write!(f, "[{}..*]", self.lower),
        }
    }
}

/// A group of sibling nodes constrained by a cardinality range.
///
/// The classification predicates are mutually exclusive: a group is AND,
/// OR, ALTERNATIVE, or a generic cardinality group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    range: Range,
}

impl Group {
    pub const fn new(range: Range) -> Self {
        Group { range }
    }

    pub const fn and() -> Self {
        Group::new(Range::AND)
    }

    pub const fn or() -> Self {
        Group::new(Range::OR)
    }

    pub const fn alternative() -> Self {
        Group::new(Range::ALTERNATIVE)
    }

    #[inline]
    pub const fn range(&self) -> Range {
        self.range
    }

    pub(crate) fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    pub fn is_and(&self) -> bool {
        self.range == Range::AND
    }

    pub fn is_or(&self) -> bool {
        self.range == Range::OR
    }

    pub fn is_alternative(&self) -> bool {
        self.range == Range::ALTERNATIVE
    }

    pub fn is_cardinality_group(&self) -> bool {
        !self.is_and() && !self.is_or() && !self.is_alternative()
    }

    /// Returns the group kind.
    pub fn kind(&self) -> GroupKind {
        if self.is_and() {
            GroupKind::And
        } else if self.is_or() {
            GroupKind::Or
        } else if self.is_alternative() {
            GroupKind::Alternative
        } else {
            GroupKind::Cardinality
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Group::and()
    }
}

/// Classification of a [`Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    And,
    Or,
    Alternative,
    Cardinality,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupKind::And => "and",
            GroupKind::Or => "or",
            GroupKind::Alternative => "alt",
            GroupKind::Cardinality => "cardinality",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_exclusive() {
        let groups = [
            Group::and(),
            Group::or(),
            Group::alternative(),
            Group::new(Range::new(2, Some(3)).unwrap()),
            Group::new(Range::new(0, Some(1)).unwrap()),
            Group::new(Range::new(2, None).unwrap()),
        ];
        for g in groups {
            let named = [g.is_and(), g.is_or(), g.is_alternative()]
                .iter()
                .filter(|b| **b)
                .count();
            assert!(named <= 1);
            assert_eq!(named == 0, g.is_cardinality_group());
        }
    }

    #[test]
    fn test_two_to_three_is_cardinality() {
        let g = Group::new(Range::new(2, Some(3)).unwrap());
        assert!(g.is_cardinality_group());
        assert!(!g.is_and());
        assert!(!g.is_or());
        assert!(!g.is_alternative());
        assert_eq!(g.kind(), GroupKind::Cardinality);
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            Range::new(2, Some(1)),
            Err(FeatureModelError::InvalidRange { lower: 2, upper: 1 })
        );
    }

    #[test]
    fn test_default_group_is_and() {
        assert_eq!(Group::default().kind(), GroupKind::And);
        assert_eq!(GroupKind::Alternative.to_string(), "alt");
    }
}
