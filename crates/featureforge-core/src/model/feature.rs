//! Features: named, attribute-backed units of configurable functionality.

use crate::attribute::{self, Attributes};
use crate::error::Result;
use crate::identifier::Identifier;

/// A feature of a [`FeatureModel`](super::FeatureModel).
///
/// Features are created and destroyed only through the owning model; the
/// owning model's identifier is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    identifier: Identifier,
    model: Identifier,
    attributes: Attributes,
}

impl Feature {
    pub(crate) fn new(identifier: Identifier, model: Identifier, name: &str) -> Result<Self> {
        let mut attributes = Attributes::new();
        attributes.set(&attribute::NAME, name.into())?;
        Ok(Self {
            identifier,
            model,
            attributes,
        })
    }

    #[inline]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Identifier of the model this feature was created in.
    #[inline]
    pub fn model_identifier(&self) -> &Identifier {
        &self.model
    }

    pub fn name(&self) -> String {
        self.attributes
            .get_string(&attribute::NAME)
            .unwrap_or_else(|| self.identifier.to_string())
    }

    pub fn description(&self) -> Option<String> {
        self.attributes.get_string(&attribute::DESCRIPTION)
    }

    pub fn is_abstract(&self) -> bool {
        self.attributes.get_flag(&attribute::ABSTRACT)
    }

    pub fn is_concrete(&self) -> bool {
        !self.is_abstract()
    }

    /// Whether this feature itself is hidden; see
    /// [`FeatureModel::is_hidden_in_tree`](super::FeatureModel::is_hidden_in_tree)
    /// for the inherited view.
    pub fn is_hidden(&self) -> bool {
        self.attributes.get_flag(&attribute::HIDDEN)
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}
