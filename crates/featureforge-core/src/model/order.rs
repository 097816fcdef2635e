//! Feature order strategies.

use std::collections::HashSet;

use super::feature::Feature;
use crate::identifier::Identifier;

/// How features are ordered for listing and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureOrder {
    /// Tree pre-order.
    #[default]
    PreOrder,
    /// Listed features first, in list order; the rest follow in pre-order.
    UserDefined(Vec<Identifier>),
}

impl FeatureOrder {
    pub fn is_user_defined(&self) -> bool {
        matches!(self, FeatureOrder::UserDefined(_))
    }

    /// Reorders `preorder` according to this strategy.
    ///
    /// Listed identifiers that no longer name a feature are skipped.
    pub fn apply<'a>(&self, preorder: Vec<&'a Feature>) -> Vec<&'a Feature> {
        let FeatureOrder::UserDefined(list) = self else {
            return preorder;
        };
        let mut placed: HashSet<&Identifier> = HashSet::with_capacity(preorder.len());
        let mut out = Vec::with_capacity(preorder.len());
        for id in list {
            if let Some(&feature) = preorder.iter().find(|f| f.identifier() == id) {
                if placed.insert(feature.identifier()) {
                    out.push(feature);
                }
            }
        }
        for feature in preorder {
            if !placed.contains(feature.identifier()) {
                out.push(feature);
            }
        }
        out
    }

    pub(crate) fn forget(&mut self, id: &Identifier) {
        if let FeatureOrder::UserDefined(list) = self {
            list.retain(|x| x != id);
        }
    }
}
