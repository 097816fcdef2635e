//! Line-numbered problems collected while reading a file.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A problem found on one line of the input (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl Problem {
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)
    }
}

/// Returned by [`ParseResult::into_result`] when problems are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.problems))]
pub struct ParseError {
    pub problems: Vec<Problem>,
}

fn summarize(problems: &[Problem]) -> String {
    match problems.first() {
        Some(first) => format!("{} problem(s), first at {first}", problems.len()),
        None => "no problems".to_string(),
    }
}

/// A best-effort value together with everything that went wrong building it.
#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    pub value: T,
    pub problems: Vec<Problem>,
}

impl<T> ParseResult<T> {
    pub fn new(value: T, problems: Vec<Problem>) -> Self {
        Self { value, problems }
    }

    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(|p| p.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Problem> {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Returns the value unless an error occurred, or, when `strict`, any problem at all.
    pub fn into_result(self, strict: bool) -> Result<T, ParseError> {
        let fatal = if strict {
            !self.problems.is_empty()
        } else {
            self.has_errors()
        };
        if fatal {
            Err(ParseError {
                problems: self.problems,
            })
        } else {
            Ok(self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_turns_warnings_fatal() {
        let lenient = ParseResult::new(1, vec![Problem::warning(3, "odd")]);
        assert!(!lenient.has_errors());
        assert_eq!(lenient.warnings().count(), 1);
        assert_eq!(lenient.clone().into_result(false), Ok(1));

        let err = lenient.into_result(true).unwrap_err();
        assert_eq!(err.problems[0].line, 3);
        assert_eq!(err.to_string(), "1 problem(s), first at line 3: warning: odd");
    }

    #[test]
    fn test_errors_always_fatal() {
        let result = ParseResult::new((), vec![Problem::error(1, "broken")]);
        assert!(result.has_errors());
        assert!(result.into_result(false).is_err());
        assert!(ParseResult::new((), Vec::new()).is_clean());
    }
}
