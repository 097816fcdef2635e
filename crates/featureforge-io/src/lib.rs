//! FeatureForge IO - Text formats around feature models
//!
//! - [`problem`]: line-numbered problems and best-effort parse results
//! - [`config_format`]: the line-oriented configuration format
//! - [`dot`]: Graphviz export of the feature tree

pub mod config_format;
pub mod dot;
pub mod problem;

pub use config_format::ConfigurationFormat;
pub use dot::to_dot;
pub use problem::{ParseError, ParseResult, Problem, Severity};
