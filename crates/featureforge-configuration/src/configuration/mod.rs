//! Configurations: a selection snapshot over a feature model's features.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use featureforge_core::{FeatureModel, HasFeatureOrder, HasFeatureTree, Identifier};
use tracing::{debug, info};

use crate::error::SelectionError;
use crate::selectable::SelectableFeature;
use crate::selection::Selection;

/// A possibly partial selection decision for every feature of a model.
///
/// The feature set is taken from the model when the configuration is built
/// and only changes through [`Configuration::update_features`]. The model is
/// shared, never copied: clones share it but own their selections.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use featureforge_core::FeatureModel;
/// use featureforge_configuration::{Configuration, Selection};
///
/// let mut model = FeatureModel::new();
/// let car = model.add_feature("Car").unwrap();
/// model.add_child("Radio", &car).unwrap();
///
/// let mut config = Configuration::new(Arc::new(model));
/// config.set_manual_by_name("Car", Selection::Selected).unwrap();
/// assert_eq!(config.selected_features(), vec!["Car"]);
/// assert_eq!(config.undefined_features(), vec!["Radio"]);
/// assert!(!config.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    model: Arc<FeatureModel>,
    features: Vec<SelectableFeature>,
    index: HashMap<String, usize>,
    hidden: HashSet<String>,
    filter_hidden: bool,
}

impl Configuration {
    /// Snapshots the model's features, all undefined, in the model's feature order.
    pub fn new(model: Arc<FeatureModel>) -> Self {
        let mut config = Self {
            model,
            features: Vec::new(),
            index: HashMap::new(),
            hidden: HashSet::new(),
            filter_hidden: true,
        };
        config.rebuild(HashMap::new());
        config
    }

    /// Builds a configuration whose manual channel follows a signed-literal
    /// assignment.
    ///
    /// Literal `l` refers to `variables[|l| - 1]`; positive literals select,
    /// negative ones deselect. Zero literals, indices past the mapping and
    /// names without a feature are skipped.
    pub fn from_literal_set(model: Arc<FeatureModel>, assignment: &[i32], variables: &[String]) -> Self {
        let mut config = Self::new(model);
        let mut applied = 0u64;
        for &literal in assignment {
            if literal == 0 {
                continue;
            }
            let Some(name) = variables.get(literal.unsigned_abs() as usize - 1) else {
                continue;
            };
            if let Some(feature) = config.feature_mut(name) {
                if feature
                    .set_manual(Selection::from_literal(literal))
                    .is_ok()
                {
                    applied += 1;
                }
            }
        }
        info!(
            event = "configuration_from_literals",
            literals = assignment.len() as u64,
            applied,
        );
        config
    }

    /// Controls whether [`manual_features`](Self::manual_features) and
    /// [`automatic_features`](Self::automatic_features) skip features with a
    /// hidden ancestor. On by default.
    pub fn with_hidden_filter(mut self, filter_hidden: bool) -> Self {
        self.filter_hidden = filter_hidden;
        self
    }

    #[inline]
    pub fn model(&self) -> &Arc<FeatureModel> {
        &self.model
    }

    /// Selectable features in the model's feature order.
    #[inline]
    pub fn features(&self) -> &[SelectableFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, name: &str) -> Option<&SelectableFeature> {
        self.index.get(name).map(|&i| &self.features[i])
    }

    pub fn feature_mut(&mut self, name: &str) -> Option<&mut SelectableFeature> {
        let i = *self.index.get(name)?;
        self.features.get_mut(i)
    }

    /// The selectable derived from the model feature `id`.
    pub fn feature_by_identifier(&self, id: &Identifier) -> Option<&SelectableFeature> {
        self.features.iter().find(|f| f.feature() == Some(id))
    }

    /// The effective selection of a feature, if the name is known.
    pub fn selection(&self, name: &str) -> Option<Selection> {
        self.feature(name).map(SelectableFeature::selection)
    }

    pub fn set_manual_by_name(&mut self, name: &str, value: Selection) -> Result<(), SelectionError> {
        let feature = self
            .feature_mut(name)
            .ok_or_else(|| SelectionError::UnknownFeature(name.to_string()))?;
        feature.set_manual(value).inspect_err(|err| {
            debug!(event = "selection_rejected", feature = %name, error = %err);
        })
    }

    pub fn set_automatic_by_name(&mut self, name: &str, value: Selection) -> Result<(), SelectionError> {
        let feature = self
            .feature_mut(name)
            .ok_or_else(|| SelectionError::UnknownFeature(name.to_string()))?;
        feature.set_automatic(value).inspect_err(|err| {
            debug!(event = "selection_rejected", feature = %name, error = %err);
        })
    }

    /// Turns every automatic decision into a manual one; see
    /// [`SelectableFeature::make_manual`].
    pub fn make_manual(&mut self, discard_deselected: bool) {
        let changed = self
            .features
            .iter_mut()
            .map(|f| f.make_manual(discard_deselected))
            .filter(|changed| *changed)
            .count();
        debug!(event = "made_manual", changed = changed as u64, discard_deselected);
    }

    /// Clears both channels of every feature.
    pub fn reset_values(&mut self) {
        self.features.iter_mut().for_each(SelectableFeature::reset);
    }

    /// Clears the automatic channel of every feature.
    pub fn reset_automatic_values(&mut self) {
        self.features
            .iter_mut()
            .for_each(SelectableFeature::reset_automatic);
    }

    fn names_with(&self, selection: Selection) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.selection() == selection)
            .map(SelectableFeature::name)
            .collect()
    }

    pub fn selected_features(&self) -> Vec<&str> {
        self.names_with(Selection::Selected)
    }

    pub fn unselected_features(&self) -> Vec<&str> {
        self.names_with(Selection::Unselected)
    }

    pub fn undefined_features(&self) -> Vec<&str> {
        self.names_with(Selection::Undefined)
    }

    fn visible(&self, feature: &SelectableFeature) -> bool {
        !self.filter_hidden || !self.hidden.contains(feature.name())
    }

    /// Features decided only manually.
    pub fn manual_features(&self) -> Vec<&SelectableFeature> {
        self.features
            .iter()
            .filter(|f| f.manual().is_defined() && !f.automatic().is_defined())
            .filter(|f| self.visible(f))
            .collect()
    }

    /// Features decided automatically.
    pub fn automatic_features(&self) -> Vec<&SelectableFeature> {
        self.features
            .iter()
            .filter(|f| f.automatic().is_defined())
            .filter(|f| self.visible(f))
            .collect()
    }

    /// True if no feature is left undefined.
    pub fn is_complete(&self) -> bool {
        self.features.iter().all(|f| f.selection().is_defined())
    }

    /// Re-derives the feature set from `model`, keeping the selections of
    /// features whose names survive.
    pub fn update_features(&mut self, model: Arc<FeatureModel>) {
        let previous: HashMap<String, SelectableFeature> = self
            .features
            .drain(..)
            .map(|f| (f.name().to_string(), f))
            .collect();
        let before = previous.len();
        self.model = model;
        self.rebuild(previous);
        info!(
            event = "configuration_updated",
            before = before as u64,
            after = self.features.len() as u64,
        );
    }

    fn rebuild(&mut self, mut previous: HashMap<String, SelectableFeature>) {
        self.features.clear();
        self.index.clear();
        self.hidden.clear();
        for feature in self.model.ordered_features() {
            let name = feature.name();
            if self.index.contains_key(&name) {
                continue;
            }
            if self.model.is_hidden_in_tree(feature.identifier()) {
                self.hidden.insert(name.clone());
            }
            let mut selectable = previous
                .remove(&name)
                .unwrap_or_else(|| SelectableFeature::new(name.clone()));
            selectable.set_feature(feature.identifier().clone());
            self.index.insert(name, self.features.len());
            self.features.push(selectable);
        }
    }
}
