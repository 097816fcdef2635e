//! Model to formula to configuration and back, through the facade.

use std::collections::HashSet;
use std::sync::Arc;

use featureforge::prelude::*;
use featureforge::{ForgeConfig, IdentifierStrategy, ParseError, Severity, Workbench};
use featureforge_test::car::{car_model, CarModel};

const VALID: [&str; 6] = ["Car", "Carbody", "Gearbox", "Automatic", "Radio", "Navigation"];

fn assignment(variables: &[String], selected: &[&str]) -> Vec<i32> {
    variables
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let literal = i as i32 + 1;
            if selected.contains(&name.as_str()) {
                literal
            } else {
                -literal
            }
        })
        .collect()
}

#[test]
fn test_lowered_car_accepts_valid_and_rejects_invalid_selections() {
    let car = car_model();
    let lowered = Workbench::default().lower(&car.model);
    assert_eq!(lowered.variables(), CarModel::NAMES);

    let valid: HashSet<&str> = VALID.into_iter().collect();
    assert_eq!(
        lowered.formula().evaluate(&|name: &str| Some(valid.contains(name))),
        Some(true)
    );

    // Navigation without the automatic gearbox.
    let invalid: HashSet<&str> = ["Car", "Carbody", "Gearbox", "Manual", "Radio", "Navigation"]
        .into_iter()
        .collect();
    assert_eq!(
        lowered.formula().evaluate(&|name: &str| Some(invalid.contains(name))),
        Some(false)
    );
}

#[test]
fn test_solver_assignment_round_trips_through_text() {
    let car = car_model();
    let bench = Workbench::default();
    let lowered = bench.lower(&car.model);
    let model = Arc::new(car.model);

    let literals = assignment(lowered.variables(), &VALID);
    let config = Configuration::from_literal_set(Arc::clone(&model), &literals, lowered.variables());
    assert!(config.is_complete());
    assert_eq!(config.selected_features(), VALID);
    // Diagnostics and Logger sit below a hidden feature.
    assert_eq!(config.manual_features().len(), CarModel::NAMES.len() - 2);

    let text = bench.write_configuration(&config);
    assert_eq!(text.lines().count(), CarModel::NAMES.len());
    assert!(text.contains("12Navigation\n"));
    assert!(text.contains("02Diagnostics\n"));

    let read = bench.read_configuration(Arc::clone(&model), &text).unwrap();
    assert_eq!(read.selected_features(), config.selected_features());
    assert_eq!(read.unselected_features(), config.unselected_features());
    assert_eq!(bench.write_configuration(&read), text);
}

#[test]
fn test_strict_settings_turn_warnings_into_failures() {
    let model = Arc::new(car_model().model);
    let text = "12Car\n12Sunroof\n";

    let lenient = Workbench::default();
    let config = lenient.read_configuration(Arc::clone(&model), text).unwrap();
    assert_eq!(config.selected_features(), vec!["Car"]);

    let strict = Workbench::new(ForgeConfig::new().with_strict_configuration_format(true));
    let err: ParseError = strict.read_configuration(Arc::clone(&model), text).unwrap_err();
    assert_eq!(err.problems.len(), 1);
    assert_eq!(err.problems[0].line, 2);
    assert_eq!(err.problems[0].severity, Severity::Warning);

    let parsed = strict.parse_configuration(model, "1\n");
    assert!(parsed.has_errors());
}

#[test]
fn test_settings_from_toml_drive_identifiers_and_filtering() {
    let settings = ForgeConfig::from_toml_str(
        r#"
        [identifiers]
        strategy = "uuid"

        [configuration_format]
        filter_hidden = false
        "#,
    )
    .unwrap();
    assert_eq!(settings.identifiers.strategy, IdentifierStrategy::Uuid);

    let bench = Workbench::new(settings);
    let mut model = bench.new_model();
    let car = model.add_feature("Car").unwrap();
    let secret = model.add_child("Secret", &car).unwrap();
    model.set_hidden(&secret, true).unwrap();
    assert_ne!(car, secret);

    let config = bench
        .read_configuration(Arc::new(model), "12Car\n02Secret\n")
        .unwrap();
    assert_eq!(config.manual_features().len(), 2);
}

#[test]
fn test_dot_lists_every_feature() {
    let car = car_model();
    let dot = Workbench::default().render_dot(&car.model);
    for name in CarModel::NAMES {
        assert!(dot.contains(&format!("label=\"{name}\"")), "missing {name}");
    }
}
