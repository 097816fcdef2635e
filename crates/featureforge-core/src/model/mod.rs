//! Feature model types: the feature tree, groups, features, constraints
//! and the [`FeatureModel`] that owns them.

mod constraint;
mod feature;
mod feature_model;
mod group;
mod mutation;
mod order;
mod traits;
mod tree;

#[cfg(test)]
mod tests;

pub use constraint::Constraint;
pub use feature::Feature;
pub use feature_model::{Element, FeatureModel, MountedModel};
pub use group::{Group, GroupKind, Range};
pub use mutation::BulkMutation;
pub use order::FeatureOrder;
pub use traits::{HasConstraints, HasFeatureOrder, HasFeatureTree};
pub use tree::{FeatureTree, NodeId, TreeNode};
