//! Scoped bulk editing of a feature model.

use super::constraint::Constraint;
use super::feature::Feature;
use super::feature_model::FeatureModel;
use super::tree::{FeatureTree, NodeId};
use crate::attribute::{Attribute, AttributeValue};
use crate::error::{FeatureModelError, Result};
use crate::formula::Formula;
use crate::identifier::Identifier;

/// Raw access to a model's tree and element collections.
///
/// Handed out by [`FeatureModel::mutate`]. Edits made here bypass the
/// element index; the model reconciles it once the closure returns.
pub struct BulkMutation<'a> {
    model: &'a mut FeatureModel,
}

impl<'a> BulkMutation<'a> {
    pub(super) fn new(model: &'a mut FeatureModel) -> Self {
        Self { model }
    }

    pub fn tree(&self) -> &FeatureTree {
        &self.model.tree
    }

    pub fn tree_mut(&mut self) -> &mut FeatureTree {
        &mut self.model.tree
    }

    pub fn node_of(&self, feature: &Identifier) -> Option<NodeId> {
        self.model.tree.node_of(feature)
    }

    pub fn feature(&self, id: &Identifier) -> Option<&Feature> {
        self.model.features.get(id)
    }

    /// Creates a feature that is not yet part of the tree.
    ///
    /// Features still unplaced when the closure returns are discarded.
    pub fn create_feature(&mut self, name: &str) -> Result<Identifier> {
        let id = self.model.next_identifier()?;
        let feature = Feature::new(id.clone(), self.model.identifier().clone(), name)?;
        if self.model.features.insert(id.clone(), feature).is_some() {
            return Err(FeatureModelError::DuplicateIdentifier(id));
        }
        Ok(id)
    }

    /// Appends a constraint. Its references are resolved on reconciliation.
    pub fn create_constraint(&mut self, formula: Formula) -> Identifier {
        let id = self.model.next_identifier_unchecked();
        let model = self.model.identifier().clone();
        self.model
            .constraints
            .push(Constraint::new(id.clone(), model, formula, Default::default()));
        id
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.model.constraints
    }

    pub fn remove_constraint(&mut self, id: &Identifier) -> Option<Constraint> {
        let index = self
            .model
            .constraints
            .iter()
            .position(|c| c.identifier() == id)?;
        Some(self.model.constraints.remove(index))
    }

    pub fn set_feature_attribute(&mut self, id: &Identifier, attribute: &Attribute, value: AttributeValue) -> Result<Option<AttributeValue>> {
        self.model
            .features
            .get_mut(id)
            .ok_or_else(|| FeatureModelError::UnknownFeature(id.clone()))?
            .attributes_mut()
            .set(attribute, value)
    }
}
