//! FeatureForge Core - Feature models and their propositional encoding
//!
//! This crate provides the fundamental abstractions for FeatureForge:
//! - Identifiers and the attribute substrate features and constraints carry
//! - Propositional formulas with a text syntax
//! - The feature tree, groups, constraints and the owning feature model
//! - Lowering of a feature model to one propositional formula

pub mod attribute;
pub mod error;
pub mod formula;
pub mod identifier;
pub mod lowering;
pub mod model;

pub use attribute::{Attribute, AttributeKey, AttributeRegistry, AttributeValue, Attributes, ValueType};
pub use error::{FeatureModelError, Result};
pub use formula::{Formula, FormulaParseError};
pub use identifier::{CounterIdentifierFactory, Identifier, IdentifierFactory, UuidIdentifierFactory};
pub use lowering::{compute_formula, compute_formula_with, LoweringOptions, ModelFormula};
pub use model::{
    BulkMutation, Constraint, Element, Feature, FeatureModel, FeatureOrder, FeatureTree, Group, GroupKind,
    HasConstraints, HasFeatureOrder, HasFeatureTree, MountedModel, NodeId, Range, TreeNode,
};

/// Everything needed to build and lower a feature model.
pub mod prelude {
    pub use crate::formula::Formula;
    pub use crate::identifier::{Identifier, IdentifierFactory};
    pub use crate::lowering::{compute_formula, compute_formula_with, LoweringOptions};
    pub use crate::model::{
        FeatureModel, FeatureOrder, Group, HasConstraints, HasFeatureOrder, HasFeatureTree, Range,
    };
}
