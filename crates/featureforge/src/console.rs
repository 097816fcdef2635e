//! Colorful console output for feature model events.
//!
//! Provides a custom `tracing` layer that formats FeatureForge events with
//! colors. Enabled by the `console` feature.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVES: [&str; 4] = [
    "featureforge=info",
    "featureforge_core=info",
    "featureforge_configuration=info",
    "featureforge_io=info",
];

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` directives are honored on top of the defaults.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::from_default_env();
        for directive in DEFAULT_DIRECTIVES {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ForgeConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!("FeatureForge v{}", env!("CARGO_PKG_VERSION"));
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats FeatureForge events with colors.
pub struct ForgeConsoleLayer;

impl<S: Subscriber> Layer<S> for ForgeConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("featureforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    model: Option<String>,
    severity: Option<String>,
    line: Option<u64>,
    features: Option<u64>,
    constraints: Option<u64>,
    variables: Option<u64>,
    tree_clauses: Option<u64>,
    constraint_clauses: Option<u64>,
    dropped: Option<u64>,
    problems: Option<u64>,
    literals: Option<u64>,
    applied: Option<u64>,
    before: Option<u64>,
    after: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "line" => self.line = Some(value),
            "features" => self.features = Some(value),
            "constraints" => self.constraints = Some(value),
            "variables" => self.variables = Some(value),
            "tree_clauses" => self.tree_clauses = Some(value),
            "constraint_clauses" => self.constraint_clauses = Some(value),
            "dropped" => self.dropped = Some(value),
            "problems" => self.problems = Some(value),
            "literals" => self.literals = Some(value),
            "applied" => self.applied = Some(value),
            "before" => self.before = Some(value),
            "after" => self.after = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "model" => self.model = Some(value.to_string()),
            "severity" => self.severity = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "model_lowered" => format_model_lowered(v),
        "bulk_mutation_reconciled" => format_bulk_mutation(v),
        "model_mounted" => format_model_mounted(v),
        "configuration_read" => format_configuration_read(v),
        "configuration_line_problem" => format_line_problem(v),
        "configuration_updated" => format_configuration_updated(v),
        "configuration_from_literals" => format_from_literals(v),
        _ if level <= Level::WARN => format_generic(level, v),
        _ => String::new(),
    }
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn header(level: Level, tag: &str) -> String {
    let level = match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => " WARN".yellow().to_string(),
        _ => " INFO".bright_green().to_string(),
    };
    format!(
        "{} {} {}",
        timestamp().bright_black(),
        level,
        format!("[{}]", tag).bright_cyan()
    )
}

fn format_model_lowered(v: &EventVisitor) -> String {
    format!(
        "{} model {} lowered: variables ({}), tree clauses ({}), constraint clauses ({})",
        header(Level::INFO, "Lowering"),
        v.model.as_deref().unwrap_or("?").white().bold(),
        count(v.variables).bright_yellow(),
        count(v.tree_clauses).bright_yellow(),
        count(v.constraint_clauses).bright_magenta()
    )
}

fn format_bulk_mutation(v: &EventVisitor) -> String {
    let dropped = v.dropped.unwrap_or(0);
    let dropped = if dropped > 0 {
        count(Some(dropped)).bright_red().to_string()
    } else {
        count(Some(dropped)).white().to_string()
    };
    format!(
        "{} bulk mutation reconciled: features ({}), constraints ({}), unplaced features dropped ({})",
        header(Level::INFO, "Model"),
        count(v.features).bright_yellow(),
        count(v.constraints).bright_yellow(),
        dropped
    )
}

fn format_model_mounted(v: &EventVisitor) -> String {
    format!(
        "{} mounted model {}: features ({}), constraints ({})",
        header(Level::INFO, "Model"),
        v.model.as_deref().unwrap_or("?").white().bold(),
        count(v.features).bright_yellow(),
        count(v.constraints).bright_yellow()
    )
}

fn format_configuration_read(v: &EventVisitor) -> String {
    let problems = v.problems.unwrap_or(0);
    let problems = if problems > 0 {
        count(Some(problems)).yellow().to_string()
    } else {
        count(Some(problems)).bright_green().to_string()
    };
    format!(
        "{} configuration read: features ({}), problems ({})",
        header(Level::INFO, "Configuration"),
        count(v.features).bright_yellow(),
        problems
    )
}

fn format_line_problem(v: &EventVisitor) -> String {
    let level = if v.severity.as_deref() == Some("error") {
        Level::ERROR
    } else {
        Level::WARN
    };
    format!(
        "{} line {}: {}",
        header(level, "Configuration"),
        count(v.line).white().bold(),
        v.message.as_deref().unwrap_or("")
    )
}

fn format_configuration_updated(v: &EventVisitor) -> String {
    format!(
        "{} features re-derived: {} -> {}",
        header(Level::INFO, "Configuration"),
        count(v.before).bright_yellow(),
        count(v.after).bright_yellow()
    )
}

fn format_from_literals(v: &EventVisitor) -> String {
    format!(
        "{} built from literal set: literals ({}), applied ({})",
        header(Level::INFO, "Configuration"),
        count(v.literals).bright_yellow(),
        count(v.applied).bright_magenta()
    )
}

fn format_generic(level: Level, v: &EventVisitor) -> String {
    format!(
        "{} {}",
        header(level, "FeatureForge"),
        v.message.as_deref().or(v.event.as_deref()).unwrap_or("")
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowering_event_lists_counts() {
        let v = EventVisitor {
            event: Some("model_lowered".into()),
            model: Some("7".into()),
            variables: Some(12_345),
            tree_clauses: Some(20),
            constraint_clauses: Some(3),
            ..Default::default()
        };
        let line = format_event(Level::INFO, &v);
        assert!(line.contains("12,345"));
        assert!(line.contains("lowered"));
    }

    #[test]
    fn test_unknown_debug_events_are_silent() {
        let v = EventVisitor {
            event: Some("feature_added".into()),
            ..Default::default()
        };
        assert!(format_event(Level::DEBUG, &v).is_empty());
        assert!(!format_event(Level::WARN, &v).is_empty());
    }
}
