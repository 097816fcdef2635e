//! Line-oriented configuration format.
//!
//! One feature per line: the manual digit, the automatic digit, then the
//! feature name (`0` unselected, `1` selected, `2` undefined). Blank lines
//! and lines starting with `#` are ignored.
//!
//! ```text
//! # car
//! 12Car
//! 02Radio
//! ```

use std::sync::Arc;

use featureforge_configuration::{Configuration, Selection, SelectionError};
use featureforge_core::FeatureModel;
use tracing::{info, warn};

use crate::problem::{ParseResult, Problem};

/// Reader and writer for the configuration format.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use featureforge_core::FeatureModel;
/// use featureforge_configuration::Selection;
/// use featureforge_io::ConfigurationFormat;
///
/// let mut model = FeatureModel::new();
/// let car = model.add_feature("Car").unwrap();
/// model.add_child("Radio", &car).unwrap();
///
/// let format = ConfigurationFormat::new();
/// let parsed = format.read(Arc::new(model), "12Car\n02Radio\n21Sunroof\n");
/// assert_eq!(parsed.problems.len(), 1);
/// assert_eq!(parsed.value.selection("Radio"), Some(Selection::Unselected));
/// assert_eq!(format.write(&parsed.value), "12Car\n02Radio\n");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationFormat {
    filter_hidden: bool,
}

impl Default for ConfigurationFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationFormat {
    pub fn new() -> Self {
        Self {
            filter_hidden: true,
        }
    }

    /// Hidden-feature filtering of the configurations this format reads.
    pub fn with_filter_hidden(mut self, filter_hidden: bool) -> Self {
        self.filter_hidden = filter_hidden;
        self
    }

    /// Reads a configuration of `model`.
    ///
    /// Unknown names, bad digits and conflicting channels are reported as
    /// warnings and the line is skipped; a line too short to carry a name
    /// is an error. Reading never stops early.
    pub fn read(&self, model: Arc<FeatureModel>, text: &str) -> ParseResult<Configuration> {
        let mut config = Configuration::new(model).with_hidden_filter(self.filter_hidden);
        let mut problems = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Err(problem) = apply_line(&mut config, line, trimmed) {
                warn!(event = "configuration_line_problem", line, severity = %problem.severity, message = %problem.message);
                problems.push(problem);
            }
        }

        info!(
            event = "configuration_read",
            features = config.len() as u64,
            problems = problems.len() as u64,
        );
        ParseResult::new(config, problems)
    }

    /// Writes every feature of `config`, in the model's feature order.
    pub fn write(&self, config: &Configuration) -> String {
        let mut out = String::with_capacity(config.len() * 16);
        for feature in config.features() {
            out.push(digit(feature.manual()));
            out.push(digit(feature.automatic()));
            out.push_str(feature.name());
            out.push('\n');
        }
        out
    }
}

fn apply_line(config: &mut Configuration, line: usize, text: &str) -> Result<(), Problem> {
    let mut chars = text.chars();
    let (Some(m), Some(a)) = (chars.next(), chars.next()) else {
        return Err(Problem::error(line, format!("line too short: '{text}'")));
    };
    let name = chars.as_str().trim();
    if name.is_empty() {
        return Err(Problem::error(line, "missing feature name"));
    }

    let manual = selection(m).ok_or_else(|| Problem::warning(line, format!("invalid selection code '{m}'")))?;
    let automatic = selection(a).ok_or_else(|| Problem::warning(line, format!("invalid selection code '{a}'")))?;

    if manual.is_defined() && automatic.is_defined() && manual != automatic {
        return Err(Problem::warning(
            line,
            format!("'{name}' is manually {manual} but automatically {automatic}"),
        ));
    }

    let feature = config
        .feature_mut(name)
        .ok_or_else(|| Problem::warning(line, format!("unknown feature '{name}'")))?;
    // A line replaces both channels, so clear the automatic one first.
    let conflict = |err: SelectionError| Problem::warning(line, err.to_string());
    feature.set_automatic(Selection::Undefined).map_err(conflict)?;
    feature.set_manual(manual).map_err(conflict)?;
    feature.set_automatic(automatic).map_err(conflict)
}

fn selection(code: char) -> Option<Selection> {
    match code {
        '0' => Some(Selection::Unselected),
        '1' => Some(Selection::Selected),
        '2' => Some(Selection::Undefined),
        _ => None,
    }
}

fn digit(selection: Selection) -> char {
    match selection {
        Selection::Unselected => '0',
        Selection::Selected => '1',
        Selection::Undefined => '2',
    }
}

#[cfg(test)]
mod tests;
