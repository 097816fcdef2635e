//! Cross-tree constraints.

use std::collections::BTreeSet;

use crate::attribute::{self, Attributes};
use crate::formula::Formula;
use crate::identifier::Identifier;

/// A propositional constraint over feature names.
///
/// `referenced_features` always equals the formula's variables resolved
/// against the owning model; the model recomputes it whenever the formula
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    identifier: Identifier,
    model: Identifier,
    formula: Formula,
    referenced: BTreeSet<Identifier>,
    attributes: Attributes,
}

impl Constraint {
    pub(crate) fn new(identifier: Identifier, model: Identifier, formula: Formula, referenced: BTreeSet<Identifier>) -> Self {
        Self {
            identifier,
            model,
            formula,
            referenced,
            attributes: Attributes::new(),
        }
    }

    #[inline]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[inline]
    pub fn model_identifier(&self) -> &Identifier {
        &self.model
    }

    #[inline]
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Features whose names occur in the formula.
    #[inline]
    pub fn referenced_features(&self) -> &BTreeSet<Identifier> {
        &self.referenced
    }

    pub fn references(&self, feature: &Identifier) -> bool {
        self.referenced.contains(feature)
    }

    pub fn name(&self) -> Option<String> {
        self.attributes.get_string(&attribute::NAME)
    }

    pub fn description(&self) -> Option<String> {
        self.attributes.get_string(&attribute::DESCRIPTION)
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub(crate) fn replace_formula(&mut self, formula: Formula, referenced: BTreeSet<Identifier>) {
        self.formula = formula;
        self.referenced = referenced;
    }

    pub(crate) fn formula_mut(&mut self) -> &mut Formula {
        &mut self.formula
    }
}
