//! The car product line.
//!
//! ```text
//! Car (abstract)
//! ├── Carbody      mandatory
//! ├── Gearbox      mandatory, alternative
//! │   ├── Manual
//! │   └── Automatic
//! ├── Radio        or
//! │   ├── Navigation
//! │   └── Bluetooth
//! └── Diagnostics  hidden
//!     └── Logger
//!
//! Navigation => Automatic
//! ```

use featureforge_core::{FeatureModel, Formula, Identifier, Result};

use crate::groups::fresh_model;

/// The car model plus the identifiers of all its elements.
#[derive(Debug, Clone)]
pub struct CarModel {
    pub model: FeatureModel,
    pub car: Identifier,
    pub carbody: Identifier,
    pub gearbox: Identifier,
    pub manual: Identifier,
    pub automatic: Identifier,
    pub radio: Identifier,
    pub navigation: Identifier,
    pub bluetooth: Identifier,
    pub diagnostics: Identifier,
    pub logger: Identifier,
    /// `Navigation => Automatic`
    pub navigation_constraint: Identifier,
}

impl CarModel {
    /// Feature names in pre-order.
    pub const NAMES: [&'static str; 10] = [
        "Car",
        "Carbody",
        "Gearbox",
        "Manual",
        "Automatic",
        "Radio",
        "Navigation",
        "Bluetooth",
        "Diagnostics",
        "Logger",
    ];
}

/// Builds the car model with a private identifier sequence.
pub fn car_model() -> CarModel {
    build().expect("car fixture is well-formed")
}

fn build() -> Result<CarModel> {
    let mut model = fresh_model();
    let car = model.add_feature("Car")?;
    model.set_abstract(&car, true)?;

    let carbody = model.add_child("Carbody", &car)?;
    model.set_mandatory(&carbody)?;

    let gearbox = model.add_child("Gearbox", &car)?;
    model.set_mandatory(&gearbox)?;
    model.set_alternative(&gearbox)?;
    let manual = model.add_child("Manual", &gearbox)?;
    let automatic = model.add_child("Automatic", &gearbox)?;

    let radio = model.add_child("Radio", &car)?;
    model.set_or(&radio)?;
    let navigation = model.add_child("Navigation", &radio)?;
    let bluetooth = model.add_child("Bluetooth", &radio)?;

    let diagnostics = model.add_child("Diagnostics", &car)?;
    model.set_hidden(&diagnostics, true)?;
    let logger = model.add_child("Logger", &diagnostics)?;

    let navigation_constraint = model.add_constraint(Formula::implies(
        Formula::literal("Navigation"),
        Formula::literal("Automatic"),
    ))?;

    Ok(CarModel {
        model,
        car,
        carbody,
        gearbox,
        manual,
        automatic,
        radio,
        navigation,
        bluetooth,
        diagnostics,
        logger,
        navigation_constraint,
    })
}
