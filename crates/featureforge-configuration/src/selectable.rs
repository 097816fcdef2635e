//! Per-feature selection state.

use featureforge_core::Identifier;

use crate::error::SelectionError;
use crate::selection::Selection;

/// Manual and automatic selection of one feature.
///
/// The two channels never disagree on a defined value. When both are
/// defined they are equal; when only one is, it decides the selection.
///
/// # Example
///
/// ```
/// use featureforge_configuration::{SelectableFeature, Selection, SelectionError};
///
/// let mut radio = SelectableFeature::new("Radio");
/// radio.set_manual(Selection::Selected).unwrap();
/// assert!(matches!(
///     radio.set_automatic(Selection::Unselected),
///     Err(SelectionError::AutomaticSelectionNotPossible { .. })
/// ));
/// assert_eq!(radio.manual(), Selection::Selected);
/// assert_eq!(radio.automatic(), Selection::Undefined);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableFeature {
    name: String,
    feature: Option<Identifier>,
    manual: Selection,
    automatic: Selection,
}

impl SelectableFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature: None,
            manual: Selection::Undefined,
            automatic: Selection::Undefined,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Links the selectable to the model feature it was derived from.
    pub fn with_feature(mut self, feature: Identifier) -> Self {
        self.feature = Some(feature);
        self
    }

    /// The model feature behind this selectable, if it came from a model.
    #[inline]
    pub fn feature(&self) -> Option<&Identifier> {
        self.feature.as_ref()
    }

    pub(crate) fn set_feature(&mut self, feature: Identifier) {
        self.feature = Some(feature);
    }

    #[inline]
    pub fn manual(&self) -> Selection {
        self.manual
    }

    #[inline]
    pub fn automatic(&self) -> Selection {
        self.automatic
    }

    /// The effective selection: automatic if defined, manual otherwise.
    pub fn selection(&self) -> Selection {
        if self.automatic.is_defined() {
            self.automatic
        } else {
            self.manual
        }
    }

    pub fn set_manual(&mut self, value: Selection) -> Result<(), SelectionError> {
        if value.is_defined() && self.automatic.is_defined() && value != self.automatic {
            return Err(SelectionError::ManualSelectionNotPossible {
                feature: self.name.clone(),
                requested: value,
                automatic: self.automatic,
            });
        }
        self.manual = value;
        Ok(())
    }

    pub fn set_automatic(&mut self, value: Selection) -> Result<(), SelectionError> {
        if value.is_defined() && self.manual.is_defined() && value != self.manual {
            return Err(SelectionError::AutomaticSelectionNotPossible {
                feature: self.name.clone(),
                requested: value,
                manual: self.manual,
            });
        }
        self.automatic = value;
        Ok(())
    }

    /// Moves a defined automatic value into the manual channel.
    ///
    /// With `discard_deselected`, an automatic deselection is dropped
    /// instead of becoming a manual one. Returns true if anything changed.
    pub fn make_manual(&mut self, discard_deselected: bool) -> bool {
        let automatic = std::mem::take(&mut self.automatic);
        match automatic {
            Selection::Undefined => false,
            Selection::Unselected if discard_deselected => true,
            defined => {
                self.manual = defined;
                true
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.manual = Selection::Undefined;
        self.automatic = Selection::Undefined;
    }

    pub(crate) fn reset_automatic(&mut self) {
        self.automatic = Selection::Undefined;
    }
}
