//! Error types for FeatureForge

use thiserror::Error;

use crate::identifier::Identifier;
use crate::model::NodeId;

/// Structural error raised by feature model operations.
///
/// Every mutation validates before it writes, so an `Err` always means the
/// model was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureModelError {
    /// The identifier does not name a feature of this model.
    #[error("Unknown feature: {0}")]
    UnknownFeature(Identifier),

    /// The identifier does not name a constraint of this model.
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(Identifier),

    /// The handle does not address a live tree node.
    #[error("Unknown tree node: {0}")]
    UnknownNode(NodeId),

    /// Two distinct elements share one identifier.
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(Identifier),

    /// The feature already labels a node of the tree.
    #[error("Feature {0} is already part of the feature tree")]
    AlreadyInTree(Identifier),

    /// Root nodes cannot be removed.
    #[error("Cannot remove root feature {0}")]
    RootRemoval(Identifier),

    /// Roots have no parent to insert a sibling under.
    #[error("Cannot add a sibling next to root feature {0}")]
    RootSibling(Identifier),

    /// A group index does not address an existing group of the node.
    #[error("Group index {index} out of range for feature {feature} ({count} groups)")]
    GroupIndexOutOfRange {
        feature: Identifier,
        index: usize,
        count: usize,
    },

    /// A child position lies past the end of the child list.
    #[error("Child index {index} out of range for feature {feature} ({count} children)")]
    ChildIndexOutOfRange {
        feature: Identifier,
        index: usize,
        count: usize,
    },

    /// A range whose upper bound lies below its lower bound.
    #[error("Invalid range [{lower}..{upper}]")]
    InvalidRange { lower: usize, upper: usize },

    /// Another feature of the model already carries the name.
    #[error("Feature name '{0}' is already in use")]
    DuplicateName(String),

    /// A formula names a variable that is not a feature of the model.
    #[error("Formula references unknown feature '{0}'")]
    UnknownVariable(String),

    /// The feature is still referenced by a constraint.
    #[error("Feature {feature} is referenced by constraint {constraint}")]
    FeatureInUse {
        feature: Identifier,
        constraint: Identifier,
    },

    /// An attribute value was rejected by its type or validator.
    #[error("Invalid value for attribute {0}")]
    InvalidAttribute(String),
}

/// Result type alias for FeatureForge operations
pub type Result<T> = std::result::Result<T, FeatureModelError>;
