//! Selection errors.

use thiserror::Error;

use crate::selection::Selection;

/// A rejected selection change. The feature is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The manual value disagrees with a defined automatic value.
    #[error("Manual selection {requested} of '{feature}' not possible: automatically {automatic}")]
    ManualSelectionNotPossible {
        feature: String,
        requested: Selection,
        automatic: Selection,
    },

    /// The automatic value disagrees with a defined manual value.
    #[error("Automatic selection {requested} of '{feature}' not possible: manually {manual}")]
    AutomaticSelectionNotPossible {
        feature: String,
        requested: Selection,
        manual: Selection,
    },

    /// No selectable feature carries this name.
    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),
}
