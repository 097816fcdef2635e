//! Lowering of a feature model to one propositional formula.
//!
//! The tree is visited in pre-order. Every node contributes the implication
//! to its parent and, for each group of its parent, the group's cardinality
//! clause; group clauses are emitted once even though every child of the
//! group triggers them. Constraints of the model and of every mounted model
//! reached by the walk are appended last.

use std::collections::HashSet;

use tracing::{info, trace};

use crate::formula::Formula;
use crate::identifier::Identifier;
use crate::model::{FeatureModel, GroupKind, HasConstraints, HasFeatureTree, NodeId};

/// Policy knobs for [`compute_formula_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Assert every root, not just roots whose own range is mandatory.
    pub assert_optional_roots: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            assert_optional_roots: true,
        }
    }
}

/// The lowered model: a conjunction of clauses plus its variable set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFormula {
    formula: Formula,
    variables: Vec<String>,
}

impl ModelFormula {
    /// The conjunction of all emitted clauses.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Feature names in pre-order, without duplicates.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The top-level conjuncts, in emission order.
    pub fn clauses(&self) -> &[Formula] {
        match &self.formula {
            Formula::And(clauses) => clauses,
            other => std::slice::from_ref(other),
        }
    }

    pub fn into_formula(self) -> Formula {
        self.formula
    }
}

/// Lowers `model` with default options.
///
/// # Example
///
/// ```
/// use featureforge_core::prelude::*;
///
/// let mut model = FeatureModel::new();
/// let car = model.add_feature("Car").unwrap();
/// let engine = model.add_child("Engine", &car).unwrap();
/// model.set_mandatory(&engine).unwrap();
///
/// let lowered = compute_formula(&model);
/// assert_eq!(lowered.formula().to_string(), "Car & (Engine => Car) & (Car => Engine)");
/// assert_eq!(lowered.variables(), ["Car", "Engine"]);
/// ```
pub fn compute_formula(model: &FeatureModel) -> ModelFormula {
    compute_formula_with(model, &LoweringOptions::default())
}

/// Lowers `model`. The result is identical for identical models.
pub fn compute_formula_with(model: &FeatureModel, options: &LoweringOptions) -> ModelFormula {
    let mut lowering = Lowering {
        model,
        clauses: Vec::new(),
        emitted: HashSet::new(),
        mounted: Vec::new(),
    };

    let tree = model.feature_tree();
    let mut variables = Vec::with_capacity(tree.len());
    let mut seen_names = HashSet::with_capacity(tree.len());
    for node in tree.preorder() {
        let name = lowering.name(node);
        if seen_names.insert(name.clone()) {
            variables.push(name);
        }
        lowering.visit(node, options);
    }

    let tree_clauses = lowering.clauses.len();
    for constraint in model.constraints() {
        lowering.push(constraint.formula().clone());
    }
    for id in std::mem::take(&mut lowering.mounted) {
        if let Some(mounted) = model.mounted_model(&id) {
            for constraint in mounted.constraints() {
                lowering.push(constraint.formula().clone());
            }
        }
    }

    info!(
        event = "model_lowered",
        model = %model.identifier(),
        variables = variables.len() as u64,
        tree_clauses = tree_clauses as u64,
        constraint_clauses = (lowering.clauses.len() - tree_clauses) as u64,
    );

    ModelFormula {
        formula: Formula::And(lowering.clauses),
        variables,
    }
}

struct Lowering<'a> {
    model: &'a FeatureModel,
    clauses: Vec<Formula>,
    emitted: HashSet<Formula>,
    mounted: Vec<Identifier>,
}

impl Lowering<'_> {
    fn name(&self, node: NodeId) -> String {
        let tree = self.model.feature_tree();
        tree.node(node)
            .map(|n| match self.model.feature(n.feature()) {
                Some(feature) => feature.name(),
                None => n.feature().to_string(),
            })
            .unwrap_or_default()
    }

    fn literal(&self, node: NodeId) -> Formula {
        Formula::literal(self.name(node))
    }

    fn push(&mut self, clause: Formula) {
        trace!(event = "clause_emitted", clause = %clause);
        self.clauses.push(clause);
    }

    fn push_once(&mut self, clause: Formula) {
        if self.emitted.insert(clause.clone()) {
            self.push(clause);
        }
    }

    fn visit(&mut self, node: NodeId, options: &LoweringOptions) {
        let model = self.model;
        let tree = model.feature_tree();
        let Some(n) = tree.node(node) else {
            return;
        };

        if let Some(feature) = model.feature(n.feature()) {
            let owner = feature.model_identifier();
            if owner != model.identifier() && !self.mounted.contains(owner) {
                self.mounted.push(owner.clone());
            }
        }

        let Some(parent) = n.parent() else {
            if options.assert_optional_roots || n.is_mandatory() {
                self.push(self.literal(node));
            }
            return;
        };

        self.push(Formula::implies(self.literal(node), self.literal(parent)));

        let Some(p) = tree.node(parent) else {
            return;
        };
        for (index, group) in p.groups().iter().enumerate() {
            let members = tree.group_children(parent, index);
            if members.is_empty() {
                continue;
            }
            let parent_literal = self.literal(parent);
            match group.kind() {
                GroupKind::Or => {
                    let any = Formula::or(members.iter().map(|c| self.literal(*c)));
                    self.push_once(Formula::implies(parent_literal, any));
                }
                GroupKind::Alternative => {
                    let one = Formula::choose(1, members.iter().map(|c| self.literal(*c)));
                    self.push_once(Formula::implies(parent_literal, one));
                }
                GroupKind::Cardinality => {
                    let range = group.range();
                    let literals = members.iter().map(|c| self.literal(*c));
                    let bounded = match range.upper() {
                        Some(upper) => Formula::between(range.lower(), upper, literals),
                        None => Formula::at_least(range.lower(), literals),
                    };
                    self.push_once(Formula::implies(parent_literal, bounded));
                }
                GroupKind::And => {
                    for child in members {
                        if tree.node(child).is_some_and(|c| c.is_mandatory()) {
                            let clause = Formula::implies(parent_literal.clone(), self.literal(child));
                            self.push_once(clause);
                        }
                    }
                }
            }
        }
    }
}
