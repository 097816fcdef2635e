//! Tests for the feature model.

mod test_mutation;
mod test_tree;

use super::*;
use crate::identifier::{CounterIdentifierFactory, Identifier};

fn id(n: u64) -> Identifier {
    Identifier::Counter(n)
}

fn empty_model() -> FeatureModel {
    FeatureModel::with_factory(Box::new(CounterIdentifierFactory::starting_at(1)))
}

// Car
// ├── Engine   (mandatory)
// ├── Radio    (OR group with Gearbox)
// └── Gearbox
fn car_model() -> (FeatureModel, Identifier, Identifier, Identifier, Identifier) {
    let mut model = empty_model();
    let car = model.add_feature("Car").unwrap();
    let engine = model.add_child("Engine", &car).unwrap();
    model.set_mandatory(&engine).unwrap();
    let group = model.add_group(&car, Group::or()).unwrap();
    let radio = model.add_child("Radio", &car).unwrap();
    let gearbox = model.add_child("Gearbox", &car).unwrap();
    model.set_group_id(&radio, group).unwrap();
    model.set_group_id(&gearbox, group).unwrap();
    (model, car, engine, radio, gearbox)
}
