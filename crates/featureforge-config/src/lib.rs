//! Configuration system for FeatureForge.
//!
//! Load settings from TOML or YAML to choose the identifier strategy, the
//! strictness of the configuration reader and the lowering policy without
//! code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use featureforge_config::{ForgeConfig, IdentifierStrategy};
//!
//! let config = ForgeConfig::from_toml_str(r#"
//!     [identifiers]
//!     strategy = "uuid"
//!
//!     [configuration_format]
//!     strict = true
//! "#).unwrap();
//!
//! assert_eq!(config.identifiers.strategy, IdentifierStrategy::Uuid);
//! assert!(config.configuration_format.strict);
//! assert!(config.configuration_format.filter_hidden);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use featureforge_config::ForgeConfig;
//!
//! let config = ForgeConfig::load("featureforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use featureforge_core::{
    CounterIdentifierFactory, FeatureModel, IdentifierFactory, LoweringOptions, UuidIdentifierFactory,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main FeatureForge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForgeConfig {
    /// How new elements are identified.
    #[serde(default)]
    pub identifiers: IdentifierConfig,

    /// Reading and filtering of configurations.
    #[serde(default)]
    pub configuration_format: ConfigurationFormatConfig,

    /// Formula lowering policy.
    #[serde(default)]
    pub lowering: LoweringConfig,
}

impl ForgeConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            Some("toml") | None => Self::from_toml_file(path),
            Some(other) => Err(ConfigError::Invalid(format!(
                "unsupported configuration file extension '.{other}'"
            ))),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the identifier strategy.
    pub fn with_identifier_strategy(mut self, strategy: IdentifierStrategy) -> Self {
        self.identifiers.strategy = strategy;
        self
    }

    /// Makes configuration-format warnings fatal.
    pub fn with_strict_configuration_format(mut self, strict: bool) -> Self {
        self.configuration_format.strict = strict;
        self
    }

    /// Controls hidden-feature filtering in configuration partition views.
    pub fn with_filter_hidden(mut self, filter_hidden: bool) -> Self {
        self.configuration_format.filter_hidden = filter_hidden;
        self
    }

    /// Controls whether lowering asserts optional roots.
    pub fn with_assert_optional_roots(mut self, assert: bool) -> Self {
        self.lowering.assert_optional_roots = assert;
        self
    }

    /// Builds the identifier factory selected by this configuration.
    pub fn identifier_factory(&self) -> Box<dyn IdentifierFactory> {
        match self.identifiers.strategy {
            IdentifierStrategy::Counter => Box::new(CounterIdentifierFactory::new()),
            IdentifierStrategy::Uuid => Box::new(UuidIdentifierFactory),
        }
    }

    /// Creates an empty feature model using the configured identifier strategy.
    pub fn new_model(&self) -> FeatureModel {
        FeatureModel::with_factory(self.identifier_factory())
    }

    /// Returns the lowering options.
    pub fn lowering_options(&self) -> LoweringOptions {
        LoweringOptions {
            assert_optional_roots: self.lowering.assert_optional_roots,
        }
    }
}

/// Identifier configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentifierConfig {
    #[serde(default)]
    pub strategy: IdentifierStrategy,
}

/// How new elements are identified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategy {
    /// Sequential numbers from a process-wide counter.
    #[default]
    Counter,

    /// Random v4 UUIDs.
    Uuid,
}

/// Configuration-format settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigurationFormatConfig {
    /// Treat warnings as fatal.
    #[serde(default)]
    pub strict: bool,

    /// Skip features with a hidden ancestor in the manual/automatic views.
    #[serde(default = "default_true")]
    pub filter_hidden: bool,
}

impl Default for ConfigurationFormatConfig {
    fn default() -> Self {
        Self {
            strict: false,
            filter_hidden: true,
        }
    }
}

/// Lowering settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoweringConfig {
    /// Assert every root unconditionally.
    #[serde(default = "default_true")]
    pub assert_optional_roots: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            assert_optional_roots: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests;
