//! Capability traits composed by [`FeatureModel`](super::FeatureModel).
//!
//! - `HasFeatureTree`: read access to the feature forest
//! - `HasConstraints`: read access to cross-tree constraints
//! - `HasFeatureOrder`: the order features are presented in

use super::constraint::Constraint;
use super::feature::Feature;
use super::order::FeatureOrder;
use super::tree::FeatureTree;
use crate::identifier::Identifier;

/// Read access to a feature forest.
pub trait HasFeatureTree {
    /// Returns the underlying tree.
    fn feature_tree(&self) -> &FeatureTree;

    /// Looks a feature up by identifier.
    fn feature(&self, id: &Identifier) -> Option<&Feature>;

    /// Returns every feature in tree pre-order.
    fn preorder_features(&self) -> Vec<&Feature> {
        let tree = self.feature_tree();
        tree.preorder()
            .into_iter()
            .filter_map(|n| tree.node(n))
            .filter_map(|n| self.feature(n.feature()))
            .collect()
    }

    /// Returns the features labeling the tree roots, in root order.
    fn root_features(&self) -> Vec<&Feature> {
        let tree = self.feature_tree();
        tree.roots()
            .iter()
            .filter_map(|n| tree.node(*n))
            .filter_map(|n| self.feature(n.feature()))
            .collect()
    }

    /// Returns the first feature in pre-order with the given name.
    fn feature_by_name(&self, name: &str) -> Option<&Feature> {
        self.preorder_features().into_iter().find(|f| f.name() == name)
    }

    /// Returns all feature names in pre-order.
    fn feature_names(&self) -> Vec<String> {
        self.preorder_features().iter().map(|f| f.name()).collect()
    }

    fn parent_feature(&self, id: &Identifier) -> Option<&Feature> {
        let tree = self.feature_tree();
        let parent = tree.node(tree.node_of(id)?)?.parent()?;
        self.feature(tree.node(parent)?.feature())
    }

    fn child_features(&self, id: &Identifier) -> Vec<&Feature> {
        let tree = self.feature_tree();
        let Some(node) = tree.node_of(id).and_then(|n| tree.node(n)) else {
            return Vec::new();
        };
        node.children()
            .iter()
            .filter_map(|c| tree.node(*c))
            .filter_map(|c| self.feature(c.feature()))
            .collect()
    }

    /// Returns true if the feature or any of its ancestors is hidden.
    fn is_hidden_in_tree(&self, id: &Identifier) -> bool {
        let tree = self.feature_tree();
        let Some(node) = tree.node_of(id) else {
            return false;
        };
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .filter_map(|n| tree.node(n))
            .filter_map(|n| self.feature(n.feature()))
            .any(Feature::is_hidden)
    }
}

/// Read access to cross-tree constraints.
pub trait HasConstraints {
    /// Returns the constraints in insertion order.
    fn constraints(&self) -> &[Constraint];

    fn constraint(&self, id: &Identifier) -> Option<&Constraint> {
        self.constraints().iter().find(|c| c.identifier() == id)
    }

    /// Returns the constraints whose formula mentions `feature`.
    fn constraints_referencing(&self, feature: &Identifier) -> Vec<&Constraint> {
        self.constraints()
            .iter()
            .filter(|c| c.references(feature))
            .collect()
    }
}

/// Presentation order of features.
pub trait HasFeatureOrder: HasFeatureTree {
    fn feature_order(&self) -> &FeatureOrder;

    /// Returns all features in the configured order.
    fn ordered_features(&self) -> Vec<&Feature> {
        self.feature_order().apply(self.preorder_features())
    }
}
