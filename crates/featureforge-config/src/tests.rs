//! Tests for FeatureForge configuration.

use featureforge_core::{HasFeatureTree, Identifier};

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        [identifiers]
        strategy = "uuid"

        [configuration_format]
        strict = true
        filter_hidden = false

        [lowering]
        assert_optional_roots = false
    "#;

    let config = ForgeConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.identifiers.strategy, IdentifierStrategy::Uuid);
    assert!(config.configuration_format.strict);
    assert!(!config.configuration_format.filter_hidden);
    assert!(!config.lowering.assert_optional_roots);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        identifiers:
          strategy: counter
        configuration_format:
          strict: true
    "#;

    let config = ForgeConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.identifiers.strategy, IdentifierStrategy::Counter);
    assert!(config.configuration_format.strict);
    assert!(config.configuration_format.filter_hidden);
    assert!(config.lowering.assert_optional_roots);
}

#[test]
fn test_defaults() {
    let config = ForgeConfig::from_toml_str("").unwrap();
    assert_eq!(config, ForgeConfig::default());
    assert!(!config.configuration_format.strict);
    assert!(config.configuration_format.filter_hidden);
    assert_eq!(config.lowering_options(), LoweringOptions::default());
}

#[test]
fn test_unknown_strategy_rejected() {
    let err = ForgeConfig::from_toml_str("[identifiers]\nstrategy = \"sequential\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_builder() {
    let config = ForgeConfig::new()
        .with_identifier_strategy(IdentifierStrategy::Uuid)
        .with_strict_configuration_format(true)
        .with_filter_hidden(false)
        .with_assert_optional_roots(false);

    assert_eq!(config.identifiers.strategy, IdentifierStrategy::Uuid);
    assert!(config.configuration_format.strict);
    assert!(!config.configuration_format.filter_hidden);
    assert!(!config.lowering_options().assert_optional_roots);
}

#[test]
fn test_identifier_factory_follows_strategy() {
    let mut counter = ForgeConfig::new().identifier_factory();
    assert!(matches!(counter.next_identifier(), Identifier::Counter(_)));

    let mut model = ForgeConfig::new()
        .with_identifier_strategy(IdentifierStrategy::Uuid)
        .new_model();
    assert!(matches!(model.identifier(), Identifier::Uuid(_)));
    let root = model.add_feature("Root").unwrap();
    assert!(matches!(root, Identifier::Uuid(_)));
    assert_eq!(model.feature_names(), vec!["Root"]);
}

#[test]
fn test_load_missing_file() {
    let err = ForgeConfig::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    let err = ForgeConfig::load("settings.json").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
