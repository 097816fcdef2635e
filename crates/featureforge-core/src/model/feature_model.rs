//! The feature model: the only mutation surface for features and constraints.
//!
//! Every single-step mutation validates first, then writes the owned
//! collection and the identifier index together. Multi-step edits go through
//! [`FeatureModel::mutate`], which reconciles the index once when the
//! closure returns.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use super::constraint::Constraint;
use super::feature::Feature;
use super::group::{Group, Range};
use super::mutation::BulkMutation;
use super::order::FeatureOrder;
use super::traits::{HasConstraints, HasFeatureOrder, HasFeatureTree};
use super::tree::{FeatureTree, NodeId, TreeNode};
use crate::attribute::{self, Attribute, AttributeValue};
use crate::error::{FeatureModelError, Result};
use crate::formula::Formula;
use crate::identifier::{CounterIdentifierFactory, Identifier, IdentifierFactory};

/// Slot of an identifier in the element index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementSlot {
    Feature,
    Constraint(usize),
}

/// A feature or constraint resolved through the element index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    Feature(&'a Feature),
    Constraint(&'a Constraint),
}

/// Constraints of a model that was mounted into this one.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedModel {
    identifier: Identifier,
    constraints: Vec<Constraint>,
}

impl MountedModel {
    #[inline]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// A feature model: a feature forest plus cross-tree constraints.
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
/// let radio = model.add_child("Radio", &car).unwrap();
/// model.add_constraint(Formula::parse("Radio => Engine").unwrap()).unwrap();
///
/// assert_eq!(model.feature_names(), vec!["Car", "Engine", "Radio"]);
/// assert_eq!(model.parent_feature(&radio).map(|f| f.name()), Some("Car".to_string()));
/// assert_eq!(model.constraints_referencing(&engine).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureModel {
    identifier: Identifier,
    factory: Box<dyn IdentifierFactory>,
    pub(super) tree: FeatureTree,
    pub(super) features: HashMap<Identifier, Feature>,
    pub(super) constraints: Vec<Constraint>,
    order: FeatureOrder,
    mounted: Vec<MountedModel>,
    elements: HashMap<Identifier, ElementSlot>,
}

impl Default for FeatureModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureModel {
    /// Creates an empty model drawing identifiers from the shared counter.
    pub fn new() -> Self {
        Self::with_factory(Box::new(CounterIdentifierFactory::new()))
    }

    /// Creates an empty model with the given identifier factory.
    pub fn with_factory(mut factory: Box<dyn IdentifierFactory>) -> Self {
        let identifier = factory.next_identifier();
        Self {
            identifier,
            factory,
            tree: FeatureTree::new(),
            features: HashMap::new(),
            constraints: Vec::new(),
            order: FeatureOrder::default(),
            mounted: Vec::new(),
            elements: HashMap::new(),
        }
    }

    #[inline]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if `id` names a feature or constraint of this model.
    pub fn contains(&self, id: &Identifier) -> bool {
        self.elements.contains_key(id)
    }

    /// Resolves an identifier through the element index in O(1).
    pub fn element(&self, id: &Identifier) -> Option<Element<'_>> {
        match self.elements.get(id)? {
            ElementSlot::Feature => self.features.get(id).map(Element::Feature),
            ElementSlot::Constraint(i) => self.constraints.get(*i).map(Element::Constraint),
        }
    }

    /// Returns the tree node labeled by the feature.
    pub fn node(&self, id: &Identifier) -> Option<&TreeNode> {
        self.tree.node(self.tree.node_of(id)?)
    }

    /// Models mounted below this one, in mount order.
    pub fn mounted_models(&self) -> &[MountedModel] {
        &self.mounted
    }

    pub fn mounted_model(&self, id: &Identifier) -> Option<&MountedModel> {
        self.mounted.iter().find(|m| &m.identifier == id)
    }

    pub(super) fn next_identifier(&mut self) -> Result<Identifier> {
        let id = self.factory.next_identifier();
        if id == self.identifier || self.elements.contains_key(&id) || self.features.contains_key(&id) {
            return Err(FeatureModelError::DuplicateIdentifier(id));
        }
        Ok(id)
    }

    pub(super) fn next_identifier_unchecked(&mut self) -> Identifier {
        self.factory.next_identifier()
    }

    fn node_of(&self, id: &Identifier) -> Result<NodeId> {
        self.tree
            .node_of(id)
            .ok_or_else(|| FeatureModelError::UnknownFeature(id.clone()))
    }

    fn new_feature(&mut self, name: &str) -> Result<Feature> {
        let id = self.next_identifier()?;
        Feature::new(id, self.identifier.clone(), name)
    }

    fn register_feature(&mut self, feature: Feature) -> Identifier {
        let id = feature.identifier().clone();
        debug!(event = "feature_added", feature = %id, name = %feature.name());
        self.elements.insert(id.clone(), ElementSlot::Feature);
        self.features.insert(id.clone(), feature);
        id
    }

    /// Adds a feature as a new tree root.
    pub fn add_feature(&mut self, name: &str) -> Result<Identifier> {
        let feature = self.new_feature(name)?;
        self.tree.add_root(feature.identifier().clone())?;
        Ok(self.register_feature(feature))
    }

    /// Adds a feature as the `index`-th child of `parent`.
    pub fn add_feature_below(&mut self, name: &str, parent: &Identifier, index: usize) -> Result<Identifier> {
        let parent_node = self.node_of(parent)?;
        let feature = self.new_feature(name)?;
        self.tree
            .add_below(feature.identifier().clone(), parent_node, index)?;
        Ok(self.register_feature(feature))
    }

    /// Appends a feature as the last child of `parent`.
    pub fn add_child(&mut self, name: &str, parent: &Identifier) -> Result<Identifier> {
        let index = self.node(parent).map_or(0, |n| n.children().len());
        self.add_feature_below(name, parent, index)
    }

    /// Adds a feature directly after `sibling`, in the sibling's group.
    pub fn add_feature_next_to(&mut self, name: &str, sibling: &Identifier) -> Result<Identifier> {
        let sibling_node = self.node_of(sibling)?;
        let feature = self.new_feature(name)?;
        self.tree
            .add_next_to(feature.identifier().clone(), sibling_node)?;
        Ok(self.register_feature(feature))
    }

    /// Removes a non-root feature; its children move up to its parent.
    ///
    /// Fails if a constraint still references the feature.
    pub fn remove_feature(&mut self, id: &Identifier) -> Result<Feature> {
        let node = self.node_of(id)?;
        if let Some(constraint) = self
            .constraints
            .iter()
            .chain(self.mounted.iter().flat_map(|m| m.constraints.iter()))
            .find(|c| c.references(id))
        {
            return Err(FeatureModelError::FeatureInUse {
                feature: id.clone(),
                constraint: constraint.identifier().clone(),
            });
        }

        self.tree.remove(node)?;
        self.elements.remove(id);
        self.order.forget(id);
        let feature = self
            .features
            .remove(id)
            .ok_or_else(|| FeatureModelError::UnknownFeature(id.clone()))?;
        debug!(event = "feature_removed", feature = %id, name = %feature.name());
        Ok(feature)
    }

    /// Resolves the formula's variables to feature identifiers.
    pub(super) fn resolve(&self, formula: &Formula) -> Result<BTreeSet<Identifier>> {
        formula
            .variables()
            .into_iter()
            .map(|name| {
                self.feature_by_name(name)
                    .map(|f| f.identifier().clone())
                    .ok_or_else(|| FeatureModelError::UnknownVariable(name.to_string()))
            })
            .collect()
    }

    /// Adds a constraint. Every variable must name a feature of the model.
    pub fn add_constraint(&mut self, formula: Formula) -> Result<Identifier> {
        let referenced = self.resolve(&formula)?;
        let id = self.next_identifier()?;
        debug!(event = "constraint_added", constraint = %id, formula = %formula);
        self.elements
            .insert(id.clone(), ElementSlot::Constraint(self.constraints.len()));
        self.constraints
            .push(Constraint::new(id.clone(), self.identifier.clone(), formula, referenced));
        Ok(id)
    }

    fn constraint_index(&self, id: &Identifier) -> Result<usize> {
        match self.elements.get(id) {
            Some(ElementSlot::Constraint(i)) => Ok(*i),
            _ => Err(FeatureModelError::UnknownConstraint(id.clone())),
        }
    }

    /// Replaces a constraint's formula and recomputes its referenced features.
    pub fn set_constraint_formula(&mut self, id: &Identifier, formula: Formula) -> Result<()> {
        let index = self.constraint_index(id)?;
        let referenced = self.resolve(&formula)?;
        debug!(event = "constraint_changed", constraint = %id, formula = %formula);
        self.constraints[index].replace_formula(formula, referenced);
        Ok(())
    }

    /// Sets an attribute of a constraint, e.g. its name or description.
    pub fn set_constraint_attribute(&mut self, id: &Identifier, attribute: &Attribute, value: AttributeValue) -> Result<Option<AttributeValue>> {
        let index = self.constraint_index(id)?;
        self.constraints[index].attributes_mut().set(attribute, value)
    }

    pub fn remove_constraint(&mut self, id: &Identifier) -> Result<Constraint> {
        let index = self.constraint_index(id)?;
        let removed = self.constraints.remove(index);
        self.elements.remove(id);
        for (i, c) in self.constraints.iter().enumerate().skip(index) {
            self.elements
                .insert(c.identifier().clone(), ElementSlot::Constraint(i));
        }
        debug!(event = "constraint_removed", constraint = %id);
        Ok(removed)
    }

    fn feature_mut(&mut self, id: &Identifier) -> Result<&mut Feature> {
        self.features
            .get_mut(id)
            .ok_or_else(|| FeatureModelError::UnknownFeature(id.clone()))
    }

    /// Renames a feature and rewrites its literal in every constraint that references it.
    ///
    /// Fails with [`FeatureModelError::DuplicateName`] if another feature already
    /// carries `name`, since constraint literals could no longer tell them apart.
    pub fn set_feature_name(&mut self, id: &Identifier, name: &str) -> Result<()> {
        let old = self
            .feature(id)
            .map(Feature::name)
            .ok_or_else(|| FeatureModelError::UnknownFeature(id.clone()))?;
        if old == name {
            return Ok(());
        }
        if self
            .features
            .values()
            .any(|f| f.identifier() != id && f.name() == name)
        {
            return Err(FeatureModelError::DuplicateName(name.to_string()));
        }
        self.feature_mut(id)?
            .attributes_mut()
            .set(&attribute::NAME, name.into())?;

        let mut rewritten = Vec::new();
        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.references(id) {
                continue;
            }
            let mut formula = constraint.formula().clone();
            formula.rename_variable(&old, name);
            match self.resolve(&formula) {
                Ok(referenced) => rewritten.push((index, formula, referenced)),
                Err(err) => {
                    self.feature_mut(id)?
                        .attributes_mut()
                        .set(&attribute::NAME, old.as_str().into())?;
                    return Err(err);
                }
            }
        }
        for (index, formula, referenced) in rewritten {
            self.constraints[index].replace_formula(formula, referenced);
        }
        // Mounted constraints keep their identifier references.
        for constraint in self
            .mounted
            .iter_mut()
            .flat_map(|m| m.constraints.iter_mut())
            .filter(|c| c.references(id))
        {
            constraint.formula_mut().rename_variable(&old, name);
        }
        debug!(event = "feature_renamed", feature = %id, from = %old, to = %name);
        Ok(())
    }

    pub fn set_feature_description(&mut self, id: &Identifier, description: Option<&str>) -> Result<()> {
        let attributes = self.feature_mut(id)?.attributes_mut();
        match description {
            Some(text) => {
                attributes.set(&attribute::DESCRIPTION, text.into())?;
            }
            None => {
                attributes.remove(&attribute::DESCRIPTION);
            }
        }
        Ok(())
    }

    pub fn set_abstract(&mut self, id: &Identifier, value: bool) -> Result<()> {
        self.feature_mut(id)?
            .attributes_mut()
            .set(&attribute::ABSTRACT, value.into())?;
        Ok(())
    }

    pub fn set_hidden(&mut self, id: &Identifier, value: bool) -> Result<()> {
        self.feature_mut(id)?
            .attributes_mut()
            .set(&attribute::HIDDEN, value.into())?;
        Ok(())
    }

    /// Sets an arbitrary attribute of a feature.
    ///
    /// Setting the name attribute goes through [`FeatureModel::set_feature_name`].
    pub fn set_feature_attribute(&mut self, id: &Identifier, attribute: &Attribute, value: AttributeValue) -> Result<Option<AttributeValue>> {
        if attribute.key() == attribute::NAME.key() {
            let previous = self.feature(id).map(|f| AttributeValue::String(f.name()));
            let name = value
                .as_str()
                .ok_or_else(|| FeatureModelError::InvalidAttribute(attribute.key().to_string()))?
                .to_string();
            self.set_feature_name(id, &name)?;
            return Ok(previous);
        }
        self.feature_mut(id)?.attributes_mut().set(attribute, value)
    }

    pub fn set_mandatory(&mut self, id: &Identifier) -> Result<()> {
        let node = self.node_of(id)?;
        self.tree.set_mandatory(node)
    }

    pub fn set_optional(&mut self, id: &Identifier) -> Result<()> {
        let node = self.node_of(id)?;
        self.tree.set_optional(node)
    }

    /// Turns the feature's first child group into an AND group.
    pub fn set_and(&mut self, id: &Identifier) -> Result<()> {
        self.set_group_range(id, 0, Range::AND)
    }

    /// Turns the feature's first child group into an OR group.
    pub fn set_or(&mut self, id: &Identifier) -> Result<()> {
        self.set_group_range(id, 0, Range::OR)
    }

    /// Turns the feature's first child group into an ALTERNATIVE group.
    pub fn set_alternative(&mut self, id: &Identifier) -> Result<()> {
        self.set_group_range(id, 0, Range::ALTERNATIVE)
    }

    pub fn set_group_range(&mut self, id: &Identifier, group: usize, range: Range) -> Result<()> {
        let node = self.node_of(id)?;
        self.tree.set_group_range(node, group, range)
    }

    /// Appends a child group to the feature and returns its index.
    pub fn add_group(&mut self, id: &Identifier, group: Group) -> Result<usize> {
        let node = self.node_of(id)?;
        self.tree.add_group(node, group)
    }

    /// Moves the feature into another group of its parent.
    pub fn set_group_id(&mut self, id: &Identifier, group: usize) -> Result<()> {
        let node = self.node_of(id)?;
        self.tree.set_group_id(node, group)
    }

    /// Sets the feature order. A user-defined list may only name features of this model.
    pub fn set_feature_order(&mut self, order: FeatureOrder) -> Result<()> {
        if let FeatureOrder::UserDefined(list) = &order {
            if let Some(unknown) = list.iter().find(|id| !self.features.contains_key(*id)) {
                return Err(FeatureModelError::UnknownFeature(unknown.clone()));
            }
        }
        self.order = order;
        Ok(())
    }

    /// Mounts `sub` below `parent`: its trees are grafted at child position
    /// `index`, its features keep their owning-model identity, and its
    /// constraints are kept in a [`MountedModel`] record.
    pub fn mount(&mut self, sub: FeatureModel, parent: &Identifier, index: usize) -> Result<()> {
        let parent_node = self.node_of(parent)?;
        let incoming = std::iter::once(&sub.identifier)
            .chain(sub.features.keys())
            .chain(sub.constraints.iter().map(Constraint::identifier))
            .chain(sub.mounted.iter().map(MountedModel::identifier));
        for id in incoming {
            if id == &self.identifier
                || self.elements.contains_key(id)
                || self.mounted_model(id).is_some()
            {
                return Err(FeatureModelError::DuplicateIdentifier(id.clone()));
            }
        }

        self.tree.graft(&sub.tree, parent_node, index)?;

        let FeatureModel {
            identifier,
            features,
            constraints,
            mounted,
            ..
        } = sub;
        info!(
            event = "model_mounted",
            model = %identifier,
            features = features.len() as u64,
            constraints = constraints.len() as u64,
        );
        for (id, feature) in features {
            self.elements.insert(id.clone(), ElementSlot::Feature);
            self.features.insert(id, feature);
        }
        self.mounted.push(MountedModel {
            identifier,
            constraints,
        });
        self.mounted.extend(mounted);
        Ok(())
    }

    /// Applies several structural edits as one unit.
    ///
    /// The element index is stale while `edit` runs and is rebuilt when it
    /// returns: the feature set is re-derived from a tree walk (features not
    /// placed in the tree are dropped), constraint references are resolved
    /// again, and every identifier is re-indexed. If reconciliation fails,
    /// the model is restored to its state before the call.
    ///
    /// # Example
    ///
    /// ```
    /// use featureforge_core::prelude::*;
    ///
    /// let mut model = FeatureModel::new();
    /// let root = model.add_feature("Root").unwrap();
    /// model
    ///     .mutate(|m| {
    ///         let root_node = m.node_of(&root).unwrap();
    ///         for name in ["A", "B", "C"] {
    ///             let id = m.create_feature(name).unwrap();
    ///             let count = m.tree().node(root_node).unwrap().children().len();
    ///             m.tree_mut().add_below(id, root_node, count).unwrap();
    ///         }
    ///         m.create_constraint(Formula::parse("A => B").unwrap());
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(model.feature_names(), vec!["Root", "A", "B", "C"]);
    /// assert_eq!(model.constraint_count(), 1);
    /// ```
    pub fn mutate<R>(&mut self, edit: impl FnOnce(&mut BulkMutation<'_>) -> R) -> Result<R> {
        let backup = (
            self.tree.clone(),
            self.features.clone(),
            self.constraints.clone(),
            self.order.clone(),
            self.elements.clone(),
        );

        let result = edit(&mut BulkMutation::new(self));

        match self.finish_internal_mutation() {
            Ok(()) => Ok(result),
            Err(err) => {
                (
                    self.tree,
                    self.features,
                    self.constraints,
                    self.order,
                    self.elements,
                ) = backup;
                Err(err)
            }
        }
    }

    fn finish_internal_mutation(&mut self) -> Result<()> {
        self.tree.validate()?;

        let mut features = HashMap::with_capacity(self.tree.len());
        for node in self.tree.preorder() {
            let Some(id) = self.tree.node(node).map(|n| n.feature().clone()) else {
                continue;
            };
            let feature = self
                .features
                .remove(&id)
                .ok_or_else(|| FeatureModelError::UnknownFeature(id.clone()))?;
            features.insert(id, feature);
        }
        let dropped = self.features.len();
        self.features = features;

        let referenced = self
            .constraints
            .iter()
            .map(|c| self.resolve(c.formula()))
            .collect::<Result<Vec<_>>>()?;
        for (constraint, refs) in self.constraints.iter_mut().zip(referenced) {
            let formula = constraint.formula().clone();
            constraint.replace_formula(formula, refs);
        }
        for constraint in self.mounted.iter().flat_map(|m| m.constraints.iter()) {
            if let Some(missing) = constraint
                .referenced_features()
                .iter()
                .find(|id| !self.features.contains_key(*id))
            {
                return Err(FeatureModelError::FeatureInUse {
                    feature: missing.clone(),
                    constraint: constraint.identifier().clone(),
                });
            }
        }

        self.rebuild_index()?;

        if let FeatureOrder::UserDefined(list) = &mut self.order {
            let features = &self.features;
            list.retain(|id| features.contains_key(id));
        }

        info!(
            event = "bulk_mutation_reconciled",
            features = self.features.len() as u64,
            constraints = self.constraints.len() as u64,
            dropped = dropped as u64,
        );
        Ok(())
    }

    fn rebuild_index(&mut self) -> Result<()> {
        let mut elements = HashMap::with_capacity(self.features.len() + self.constraints.len());
        for id in self.features.keys() {
            if elements.insert(id.clone(), ElementSlot::Feature).is_some() {
                return Err(FeatureModelError::DuplicateIdentifier(id.clone()));
            }
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if elements
                .insert(c.identifier().clone(), ElementSlot::Constraint(i))
                .is_some()
            {
                return Err(FeatureModelError::DuplicateIdentifier(c.identifier().clone()));
            }
        }
        self.elements = elements;
        Ok(())
    }
}

impl HasFeatureTree for FeatureModel {
    fn feature_tree(&self) -> &FeatureTree {
        &self.tree
    }

    fn feature(&self, id: &Identifier) -> Option<&Feature> {
        self.features.get(id)
    }
}

impl HasConstraints for FeatureModel {
    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn constraint(&self, id: &Identifier) -> Option<&Constraint> {
        match self.elements.get(id)? {
            ElementSlot::Constraint(i) => self.constraints.get(*i),
            ElementSlot::Feature => None,
        }
    }
}

impl HasFeatureOrder for FeatureModel {
    fn feature_order(&self) -> &FeatureOrder {
        &self.order
    }
}
