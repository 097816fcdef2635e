use super::*;
use crate::error::FeatureModelError;
use crate::formula::Formula;

#[test]
fn test_bulk_edit_reconciles_index() {
    let (mut model, car, ..) = car_model();

    let (sunroof, constraint) = model
        .mutate(|m| {
            let car_node = m.node_of(&car).unwrap();
            let sunroof = m.create_feature("Sunroof").unwrap();
            let count = m.tree().node(car_node).unwrap().children().len();
            m.tree_mut().add_below(sunroof.clone(), car_node, count).unwrap();
            let constraint = m.create_constraint(Formula::parse("Sunroof => Engine").unwrap());
            (sunroof, constraint)
        })
        .unwrap();

    assert!(matches!(model.element(&sunroof), Some(Element::Feature(_))));
    let c = model.constraint(&constraint).unwrap();
    assert!(c.references(&sunroof));
    assert_eq!(c.referenced_features().len(), 2);
    assert_eq!(model.feature_names().last().map(String::as_str), Some("Sunroof"));
}

#[test]
fn test_unplaced_features_are_dropped() {
    let (mut model, ..) = car_model();
    let orphan = model.mutate(|m| m.create_feature("Orphan").unwrap()).unwrap();
    assert!(!model.contains(&orphan));
    assert!(model.feature(&orphan).is_none());
    assert_eq!(model.feature_count(), 4);
}

#[test]
fn test_failed_reconciliation_restores_model() {
    let (mut model, _, _, radio, _) = car_model();
    model
        .add_constraint(Formula::parse("Radio | Gearbox").unwrap())
        .unwrap();
    let before = model.feature_names();

    let result = model.mutate(|m| {
        let node = m.node_of(&radio).unwrap();
        m.tree_mut().remove(node).unwrap();
    });

    assert_eq!(result, Err(FeatureModelError::UnknownVariable("Radio".into())));
    assert_eq!(model.feature_names(), before);
    assert!(model.contains(&radio));
    assert_eq!(model.constraint_count(), 1);
}

#[test]
fn test_bulk_removal_of_constraint_and_feature() {
    let (mut model, _, _, radio, _) = car_model();
    let c = model
        .add_constraint(Formula::parse("Radio | Gearbox").unwrap())
        .unwrap();

    model
        .mutate(|m| {
            m.remove_constraint(&c).unwrap();
            let node = m.node_of(&radio).unwrap();
            m.tree_mut().remove(node).unwrap();
        })
        .unwrap();

    assert!(!model.contains(&c));
    assert!(!model.contains(&radio));
    assert_eq!(model.feature_names(), vec!["Car", "Engine", "Gearbox"]);
}
