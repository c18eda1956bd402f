//! Semantic validation of parsed structures
//!
//! The parsers only check lexical shape. This pass takes their output and
//! reports values that parse but cannot be right (hour 25, a delay longer
//! than a day) as errors, and values that are probably mistakes as
//! warnings. Paths into the structure are 1-based throughout.

pub mod interval;

pub use interval::{validate_flexible, validate_scheduling, validate_update_interval};

use crate::address::NumericRange;
use crate::logging::{codes, Code};
use crate::{log_error, log_success, log_warning};
use crate::time::SimpleInterval;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One semantic problem found in a parsed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: Code,
    pub message: String,
    /// Location inside the parsed value, e.g. `intervals/2/h/1`
    pub path: String,
}

impl ValidationIssue {
    pub fn error(code: Code, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn warning(code: Code, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Whether no issue is an error
pub fn is_valid(issues: &[ValidationIssue]) -> bool {
    !issues.iter().any(ValidationIssue::is_error)
}

/// Send each issue to the global logger and return them unchanged
pub fn report(subject: &str, issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
    for issue in &issues {
        match issue.severity {
            IssueSeverity::Error => log_error!(issue.code, &issue.message,
                "subject" => subject,
                "path" => &issue.path
            ),
            IssueSeverity::Warning => log_warning!(issue.code, &issue.message,
                "subject" => subject,
                "path" => &issue.path
            ),
        }
    }

    if issues.is_empty() {
        log_success!(codes::success::VALIDATION_PASSED, "Validation passed",
            "subject" => subject
        );
    }
    issues
}

/// Lower bound of a numeric range must not exceed the upper bound
pub fn validate_numeric_range(range: &NumericRange, path: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if range.from.is_macro() || range.till.as_ref().is_some_and(|t| t.is_macro()) {
        issues.push(ValidationIssue::warning(
            codes::semantic::UNRESOLVED_MACRO,
            path,
            format!("range \"{}\" is checked only after macro expansion", range),
        ));
    } else if let Some((from, till)) = range.bounds() {
        if from > till {
            issues.push(ValidationIssue::error(
                codes::semantic::INVERTED_RANGE,
                path,
                format!("range \"{}\": start must be less or equal to end", range),
            ));
        }
    }
    issues
}

/// A time unit value must fit into a signed 32-bit number of seconds
pub fn validate_simple_interval(interval: &SimpleInterval, path: &str) -> Vec<ValidationIssue> {
    match interval {
        SimpleInterval::Macro { text } => vec![ValidationIssue::warning(
            codes::semantic::UNRESOLVED_MACRO,
            path,
            format!("\"{}\" is checked only after macro expansion", text),
        )],
        SimpleInterval::Literal { .. } => {
            let fits = interval
                .to_seconds()
                .is_some_and(|seconds| i32::try_from(seconds).is_ok());
            if fits {
                Vec::new()
            } else {
                vec![ValidationIssue::error(
                    codes::semantic::VALUE_OUT_OF_RANGE,
                    path,
                    format!("value \"{}\" is too large", interval),
                )]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{NumericRangeParser, Operand, RangeOptions};
    use crate::macros::MacroOptions;
    use crate::syntax::Parser;
    use crate::time::TimeUnit;

    #[test]
    fn test_inverted_range() {
        let range = NumericRangeParser::default().parse("10-1", 0).into_value().unwrap();
        let issues = validate_numeric_range(&range, "ranges/1");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, codes::semantic::INVERTED_RANGE);
        assert_eq!(
            issues[0].to_string(),
            "ranges/1: range \"10-1\": start must be less or equal to end"
        );
        assert!(!is_valid(&issues));
    }

    #[test]
    fn test_macro_range_is_a_warning() {
        let parser = NumericRangeParser::new(RangeOptions {
            allow_negative: false,
            macros: MacroOptions::user(),
        });
        let range = parser.parse("{$MIN}-1", 0).into_value().unwrap();
        assert_eq!(range.from, Operand::Macro("{$MIN}".to_string()));

        let issues = validate_numeric_range(&range, "ranges/1");
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
        assert!(is_valid(&issues));
    }

    #[test]
    fn test_simple_interval_must_fit_i32() {
        let ok = SimpleInterval::Literal {
            text: "68".to_string(),
            magnitude: 68,
            unit: Some(TimeUnit::Year),
        };
        assert!(validate_simple_interval(&ok, "delay").is_empty());

        let too_large = SimpleInterval::Literal {
            text: "69".to_string(),
            magnitude: 69,
            unit: Some(TimeUnit::Year),
        };
        let issues = validate_simple_interval(&too_large, "delay");
        assert_eq!(issues[0].code, codes::semantic::VALUE_OUT_OF_RANGE);
        assert_eq!(issues[0].message, "value \"69y\" is too large");
    }

    #[test]
    fn test_report_returns_issues_unchanged() {
        let issues = vec![ValidationIssue::warning(
            codes::semantic::DELAY_EXCEEDS_PERIOD,
            "intervals/1",
            "slow",
        )];
        assert_eq!(report("update_interval", issues.clone()), issues);
        assert!(report("update_interval", Vec::new()).is_empty());
    }
}
