//! FeatureForge Configuration - Feature selections over a feature model
//!
//! - [`Selection`]: tri-state selection value
//! - [`SelectableFeature`]: manual and automatic channel of one feature
//! - [`Configuration`]: a selection snapshot of a whole model

pub mod configuration;
pub mod error;
pub mod selectable;
pub mod selection;

pub use configuration::Configuration;
pub use error::SelectionError;
pub use selectable::SelectableFeature;
pub use selection::Selection;
