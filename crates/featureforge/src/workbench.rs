//! Entry point that wires settings into the model, lowering and IO layers.

use std::path::Path;
use std::sync::Arc;

use featureforge_config::{ConfigError, ForgeConfig};
use featureforge_configuration::Configuration;
use featureforge_core::{compute_formula_with, FeatureModel, ModelFormula};
use featureforge_io::{to_dot, ConfigurationFormat, ParseError, ParseResult};
use tracing::debug;

/// Applies one [`ForgeConfig`] to every step of a feature-model workflow.
///
/// # Example
///
/// ```
/// use featureforge::Workbench;
/// use featureforge::prelude::*;
///
/// let bench = Workbench::default();
/// let mut model = bench.new_model();
/// let car = model.add_feature("Car").unwrap();
/// model.add_child("Radio", &car).unwrap();
///
/// let lowered = bench.lower(&model);
/// assert_eq!(lowered.variables(), ["Car", "Radio"]);
///
/// let config = bench.read_configuration(model.into(), "11Car\n00Radio\n").unwrap();
/// assert!(config.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    config: ForgeConfig,
}

impl Workbench {
    pub fn new(config: ForgeConfig) -> Self {
        Self { config }
    }

    /// Loads settings from a TOML or YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ForgeConfig::load(path).map(Self::new)
    }

    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ForgeConfig::load(path) {
            Ok(config) => Self::new(config),
            Err(err) => {
                debug!(event = "settings_defaulted", path = %path.display(), error = %err);
                Self::default()
            }
        }
    }

    #[inline]
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// An empty model using the configured identifier strategy.
    pub fn new_model(&self) -> FeatureModel {
        self.config.new_model()
    }

    /// Lowers `model` with the configured lowering policy.
    pub fn lower(&self, model: &FeatureModel) -> ModelFormula {
        compute_formula_with(model, &self.config.lowering_options())
    }

    fn format(&self) -> ConfigurationFormat {
        ConfigurationFormat::new().with_filter_hidden(self.config.configuration_format.filter_hidden)
    }

    /// Reads a configuration, keeping every problem found.
    pub fn parse_configuration(&self, model: Arc<FeatureModel>, text: &str) -> ParseResult<Configuration> {
        self.format().read(model, text)
    }

    /// Reads a configuration; errors always fail, warnings fail in strict mode.
    pub fn read_configuration(&self, model: Arc<FeatureModel>, text: &str) -> Result<Configuration, ParseError> {
        self.parse_configuration(model, text)
            .into_result(self.config.configuration_format.strict)
    }

    pub fn write_configuration(&self, config: &Configuration) -> String {
        self.format().write(config)
    }

    /// Graphviz rendering of the feature tree.
    pub fn render_dot(&self, model: &FeatureModel) -> String {
        to_dot(model)
    }
}
