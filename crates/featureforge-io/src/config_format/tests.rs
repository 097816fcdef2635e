use featureforge_core::FeatureOrder;
use featureforge_test::car::{car_model, CarModel};

use super::*;
use crate::problem::Severity;

fn car() -> Arc<FeatureModel> {
    Arc::new(car_model().model)
}

#[test]
fn test_reads_both_channels() {
    let text = "\
# a comment
11Car

21Carbody
02Radio
";
    let parsed = ConfigurationFormat::new().read(car(), text);

    assert!(parsed.is_clean());
    let config = parsed.value;
    let car = config.feature("Car").unwrap();
    assert_eq!((car.manual(), car.automatic()), (Selection::Selected, Selection::Selected));
    let carbody = config.feature("Carbody").unwrap();
    assert_eq!(carbody.manual(), Selection::Undefined);
    assert_eq!(carbody.automatic(), Selection::Selected);
    assert_eq!(config.selection("Radio"), Some(Selection::Unselected));
    assert_eq!(config.selection("Manual"), Some(Selection::Undefined));
}

#[test]
fn test_problems_are_line_numbered_and_parsing_continues() {
    let text = "12Car\n1xRadio\n22Sunroof\n10Gearbox\n1\n12Carbody\n";
    let parsed = ConfigurationFormat::new().read(car(), text);

    let lines: Vec<_> = parsed.problems.iter().map(|p| p.line).collect();
    assert_eq!(lines, vec![2, 3, 4, 5]);
    assert_eq!(parsed.problems[0].message, "invalid selection code 'x'");
    assert_eq!(parsed.problems[1].message, "unknown feature 'Sunroof'");
    assert_eq!(parsed.problems[3].severity, Severity::Error);
    assert_eq!(parsed.warnings().count(), 3);
    assert!(parsed.has_errors());

    assert_eq!(parsed.value.selection("Radio"), Some(Selection::Undefined));
    assert_eq!(parsed.value.selection("Gearbox"), Some(Selection::Undefined));
    assert_eq!(parsed.value.selection("Carbody"), Some(Selection::Selected));
}

#[test]
fn test_strict_reading_rejects_warnings() {
    let parsed = ConfigurationFormat::new().read(car(), "12Car\n12Sunroof\n");
    assert!(parsed.clone().into_result(true).is_err());
    let config = parsed.into_result(false).unwrap();
    assert_eq!(config.selection("Car"), Some(Selection::Selected));
}

#[test]
fn test_later_line_replaces_earlier_one() {
    let parsed = ConfigurationFormat::new().read(car(), "21Radio\n02Radio\n");
    assert!(parsed.is_clean());
    let radio = parsed.value.feature("Radio").unwrap();
    assert_eq!(radio.manual(), Selection::Unselected);
    assert_eq!(radio.automatic(), Selection::Undefined);
}

#[test]
fn test_write_follows_feature_order() {
    let mut car = car_model();
    car.model
        .set_feature_order(FeatureOrder::UserDefined(vec![car.radio.clone()]))
        .unwrap();
    let format = ConfigurationFormat::new();
    let parsed = format.read(Arc::new(car.model), "12Car\n20Radio\n");

    let text = format.write(&parsed.value);
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines.len(), CarModel::NAMES.len());
    assert_eq!(lines[0], "20Radio");
    assert_eq!(lines[1], "12Car");
    assert_eq!(lines[2], "22Carbody");
}

#[test]
fn test_written_text_reads_back() {
    let format = ConfigurationFormat::new();
    let mut config = Configuration::new(car());
    config.set_manual_by_name("Car", Selection::Selected).unwrap();
    config
        .set_automatic_by_name("Gearbox", Selection::Selected)
        .unwrap();
    config
        .set_manual_by_name("Bluetooth", Selection::Unselected)
        .unwrap();

    let text = format.write(&config);
    let parsed = format.read(Arc::clone(config.model()), &text);

    assert!(parsed.is_clean());
    assert_eq!(parsed.value.features(), config.features());
}
