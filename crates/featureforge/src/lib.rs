//! FeatureForge - Feature models, formula lowering and configurations
//!
//! Build a feature model, lower it to a propositional formula, and track
//! partial configurations over it.
//!
//! # Example
//!
//! ```rust
//! use featureforge::prelude::*;
//!
//! let mut model = FeatureModel::new();
//! let car = model.add_feature("Car").unwrap();
//! let engine = model.add_child("Engine", &car).unwrap();
//! model.set_mandatory(&engine).unwrap();
//!
//! let lowered = compute_formula(&model);
//! assert_eq!(lowered.formula().to_string(), "Car & (Engine => Car) & (Car => Engine)");
//! ```

// Model, formulas and identifiers
pub use featureforge_core::{
    attribute, compute_formula, compute_formula_with, formula, identifier, lowering, model,
    Attribute, AttributeValue, Constraint, Feature, FeatureModelError, FeatureModel, FeatureOrder,
    FeatureTree, Formula, Group, GroupKind, HasConstraints, HasFeatureOrder, HasFeatureTree,
    Identifier, IdentifierFactory, LoweringOptions, ModelFormula, NodeId, Range,
};

// Configurations
pub use featureforge_configuration::{Configuration, SelectableFeature, Selection, SelectionError};

// Text formats
pub use featureforge_io::{to_dot, ConfigurationFormat, ParseError, ParseResult, Problem, Severity};

// Settings
pub use featureforge_config::{ConfigError, ForgeConfig, IdentifierStrategy};

mod workbench;
pub use workbench::Workbench;

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use featureforge_core::prelude::*;
    pub use super::{Configuration, ConfigurationFormat, Selection, Workbench};
}
