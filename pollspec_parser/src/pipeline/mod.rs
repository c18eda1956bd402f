//! Single-call front door over every grammar in the crate
//!
//! The CLI and embedding tools pick a grammar by name, hand over the raw
//! text and get back a serializable [`ParseReport`]: outcome, matched span,
//! positional error, the structured value as JSON and, when enabled, the
//! semantic issues found in it. This is the only layer that logs parse
//! results; the parsers themselves stay silent.

use crate::address::{
    DnsParser, Ipv4Parser, NumericRangeParser, RangeOptions, RangesParser, StatusCodeRangeParser,
};
use crate::config::ParserPreferences;
use crate::formula::ConditionFormulaParser;
use crate::interval::{
    CustomIntervalsParser, FlexibleIntervalParser, Interval, SchedulingIntervalParser,
    UpdateIntervalParser,
};
use crate::logging::{codes, Code};
use crate::{log_error, log_success};
use crate::macros::{
    FunctionMacroParser, LldFunctionMacroParser, LldMacroParser, MacroParser, ReferenceMode,
    ReplacementParser, UserMacroParser,
};
use crate::rules::ValidationRuleParser;
use crate::syntax::{ParseOutcome, Parsed, Parser};
use crate::time::{
    AbsoluteTimeParser, RangeTimeParser, RelativeTimeParser, SimpleIntervalOptions,
    SimpleIntervalParser,
};
use crate::validation::{self, ValidationIssue};
use serde::Serialize;
use std::fmt;

/// Every grammar reachable through [`run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum GrammarKind {
    UserMacro,
    LldMacro,
    Macro,
    FunctionMacro,
    LldFunctionMacro,
    Replacement,
    Ipv4,
    Dns,
    NumericRange,
    StatusCodes,
    Ranges,
    AbsoluteTime,
    RelativeTime,
    RangeTime,
    SimpleInterval,
    Flexible,
    Scheduling,
    CustomIntervals,
    UpdateInterval,
    Formula,
    Rules,
}

impl GrammarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrammarKind::UserMacro => "user-macro",
            GrammarKind::LldMacro => "lld-macro",
            GrammarKind::Macro => "macro",
            GrammarKind::FunctionMacro => "function-macro",
            GrammarKind::LldFunctionMacro => "lld-function-macro",
            GrammarKind::Replacement => "replacement",
            GrammarKind::Ipv4 => "ipv4",
            GrammarKind::Dns => "dns",
            GrammarKind::NumericRange => "numeric-range",
            GrammarKind::StatusCodes => "status-codes",
            GrammarKind::Ranges => "ranges",
            GrammarKind::AbsoluteTime => "absolute-time",
            GrammarKind::RelativeTime => "relative-time",
            GrammarKind::RangeTime => "range-time",
            GrammarKind::SimpleInterval => "simple-interval",
            GrammarKind::Flexible => "flexible",
            GrammarKind::Scheduling => "scheduling",
            GrammarKind::CustomIntervals => "custom-intervals",
            GrammarKind::UpdateInterval => "update-interval",
            GrammarKind::Formula => "formula",
            GrammarKind::Rules => "rules",
        }
    }
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to parse and the grammar-specific knobs that go with it
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub kind: GrammarKind,
    pub start: usize,
    /// Names known to the built-in macro grammar
    pub macro_names: Vec<String>,
    pub reference: ReferenceMode,
    /// Signed bounds for numeric ranges and simple intervals
    pub allow_negative: bool,
    /// Accept `M` and `y` suffixes in simple intervals
    pub with_year: bool,
}

impl ParseRequest {
    pub fn new(kind: GrammarKind) -> Self {
        Self {
            kind,
            start: 0,
            macro_names: Vec::new(),
            reference: ReferenceMode::None,
            allow_negative: false,
            with_year: false,
        }
    }

    pub fn at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }
}

/// Positional error as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedError {
    pub code: Code,
    pub message: String,
    pub offset: usize,
}

/// Serializable result of one [`run`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub grammar: GrammarKind,
    pub outcome: ParseOutcome,
    pub start: usize,
    pub matched_length: usize,
    pub matched_text: String,
    pub error: Option<ReportedError>,
    pub value: Option<serde_json::Value>,
    pub issues: Vec<ValidationIssue>,
}

impl ParseReport {
    /// Matched, and no semantic issue is an error
    pub fn is_ok(&self) -> bool {
        self.outcome != ParseOutcome::Fail && validation::is_valid(&self.issues)
    }
}

fn no_issues<T>(_: &T) -> Vec<ValidationIssue> {
    Vec::new()
}

/// Parse `source` with the requested grammar
pub fn run(request: &ParseRequest, source: &str, prefs: &ParserPreferences) -> ParseReport {
    let macros = prefs.macro_options();
    let start = request.start;
    let range_options = RangeOptions {
        allow_negative: request.allow_negative,
        macros,
    };

    match request.kind {
        GrammarKind::UserMacro => {
            finish(request, prefs, UserMacroParser.parse(source, start), no_issues)
        }
        GrammarKind::LldMacro => {
            finish(request, prefs, LldMacroParser.parse(source, start), no_issues)
        }
        GrammarKind::Macro => {
            let parser = MacroParser::new(&request.macro_names, request.reference);
            finish(request, prefs, parser.parse(source, start), no_issues)
        }
        GrammarKind::FunctionMacro => {
            finish(request, prefs, FunctionMacroParser.parse(source, start), no_issues)
        }
        GrammarKind::LldFunctionMacro => {
            finish(request, prefs, LldFunctionMacroParser.parse(source, start), no_issues)
        }
        GrammarKind::Replacement => {
            finish(request, prefs, ReplacementParser.parse(source, start), no_issues)
        }
        GrammarKind::Ipv4 => {
            let parsed = Ipv4Parser::with_macros(macros).parse(source, start);
            finish(request, prefs, parsed, no_issues)
        }
        GrammarKind::Dns => {
            let parsed = DnsParser::with_macros(macros).parse(source, start);
            finish(request, prefs, parsed, no_issues)
        }
        GrammarKind::NumericRange => {
            let parsed = NumericRangeParser::new(range_options).parse(source, start);
            finish(request, prefs, parsed, |range| {
                validation::validate_numeric_range(range, "range")
            })
        }
        GrammarKind::StatusCodes => {
            let parsed = RangesParser::new(StatusCodeRangeParser::new(macros)).parse(source, start);
            finish(request, prefs, parsed, |ranges| validate_ranges(ranges))
        }
        GrammarKind::Ranges => {
            let parser = RangesParser::new(NumericRangeParser::new(range_options));
            let parsed = parser.parse(source, start);
            finish(request, prefs, parsed, |ranges| validate_ranges(ranges))
        }
        GrammarKind::AbsoluteTime => {
            finish(request, prefs, AbsoluteTimeParser.parse(source, start), no_issues)
        }
        GrammarKind::RelativeTime => {
            finish(request, prefs, RelativeTimeParser.parse(source, start), no_issues)
        }
        GrammarKind::RangeTime => {
            let parsed = RangeTimeParser::new(macros).parse(source, start);
            finish(request, prefs, parsed, no_issues)
        }
        GrammarKind::SimpleInterval => {
            let parser = SimpleIntervalParser::new(SimpleIntervalOptions {
                allow_negative: request.allow_negative,
                with_year: request.with_year,
                macros,
            });
            finish(request, prefs, parser.parse(source, start), |interval| {
                validation::validate_simple_interval(interval, "interval")
            })
        }
        GrammarKind::Flexible => {
            let parsed = FlexibleIntervalParser::new(macros).parse(source, start);
            finish(request, prefs, parsed, |interval| {
                validation::validate_flexible(interval, "interval")
            })
        }
        GrammarKind::Scheduling => {
            let parsed = SchedulingIntervalParser.parse(source, start);
            finish(request, prefs, parsed, |interval| {
                validation::validate_scheduling(interval, "interval")
            })
        }
        GrammarKind::CustomIntervals => {
            let parsed = CustomIntervalsParser::new(macros).parse(source, start);
            finish(request, prefs, parsed, |intervals| validate_intervals(intervals))
        }
        GrammarKind::UpdateInterval => {
            let parsed = UpdateIntervalParser::new(macros).parse(source, start);
            finish(request, prefs, parsed, validation::validate_update_interval)
        }
        GrammarKind::Formula => {
            finish(request, prefs, ConditionFormulaParser.parse(source, start), no_issues)
        }
        GrammarKind::Rules => {
            finish(request, prefs, ValidationRuleParser.parse(source, start), no_issues)
        }
    }
}

fn validate_ranges(ranges: &[crate::address::NumericRange]) -> Vec<ValidationIssue> {
    ranges
        .iter()
        .enumerate()
        .flat_map(|(i, range)| {
            validation::validate_numeric_range(range, &format!("ranges/{}", i + 1))
        })
        .collect()
}

fn validate_intervals(intervals: &[Interval]) -> Vec<ValidationIssue> {
    intervals
        .iter()
        .enumerate()
        .flat_map(|(i, interval)| {
            let path = format!("intervals/{}", i + 1);
            match interval {
                Interval::Flexible(flexible) => validation::validate_flexible(flexible, &path),
                Interval::Scheduling(scheduling) => {
                    validation::validate_scheduling(scheduling, &path)
                }
            }
        })
        .collect()
}

fn finish<T: Serialize>(
    request: &ParseRequest,
    prefs: &ParserPreferences,
    parsed: Parsed<'_, T>,
    validate: impl FnOnce(&T) -> Vec<ValidationIssue>,
) -> ParseReport {
    let grammar = request.kind;
    let trailing = prefs.require_full_match && parsed.outcome() == ParseOutcome::SuccessPartial;
    let parsed = if prefs.require_full_match {
        parsed.require_full()
    } else {
        parsed
    };

    let error = parsed.error().map(|err| ReportedError {
        code: if trailing {
            codes::syntax::TRAILING_INPUT
        } else {
            err.error_code()
        },
        message: err.to_string(),
        offset: err.offset(),
    });

    match &error {
        Some(err) => log_error!(err.code, &err.message,
            "grammar" => grammar,
            "offset" => err.offset
        ),
        None if parsed.is_full() => log_success!(codes::success::PARSE_COMPLETE, "Parse complete",
            "grammar" => grammar,
            "length" => parsed.matched_length()
        ),
        None => log_success!(codes::success::PARSE_PARTIAL, "Parse matched a prefix",
            "grammar" => grammar,
            "length" => parsed.matched_length(),
            "remainder" => parsed.remainder()
        ),
    }

    let issues = match parsed.value() {
        Some(value) if prefs.validate_semantics => {
            validation::report(grammar.as_str(), validate(value))
        }
        _ => Vec::new(),
    };

    let value = parsed.value().and_then(|value| match serde_json::to_value(value) {
        Ok(json) => Some(json),
        Err(err) => {
            log_error!(codes::system::INTERNAL_ERROR, "Failed to serialize parsed value",
                "grammar" => grammar,
                "error" => err
            );
            None
        }
    });

    ParseReport {
        grammar,
        outcome: parsed.outcome(),
        start: parsed.start(),
        matched_length: parsed.matched_length(),
        matched_text: parsed.matched_text().to_string(),
        error,
        value,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IssueSeverity;
    use assert_matches::assert_matches;

    fn prefs(require_full_match: bool, validate_semantics: bool) -> ParserPreferences {
        ParserPreferences {
            allow_user_macros: true,
            allow_lld_macros: false,
            require_full_match,
            validate_semantics,
        }
    }

    #[test]
    fn test_full_match_report() {
        let report = run(
            &ParseRequest::new(GrammarKind::UpdateInterval),
            "30s;wd1-5h9",
            &prefs(true, true),
        );
        assert_eq!(report.outcome, ParseOutcome::Success);
        assert_eq!(report.matched_text, "30s;wd1-5h9");
        assert!(report.error.is_none());
        assert!(report.issues.is_empty());
        assert!(report.is_ok());

        let value = report.value.unwrap();
        assert_eq!(value["intervals"][0]["kind"], "scheduling");
    }

    #[test]
    fn test_partial_match_is_kept_when_not_strict() {
        let report = run(
            &ParseRequest::new(GrammarKind::Formula),
            "A or B)",
            &prefs(false, false),
        );
        assert_eq!(report.outcome, ParseOutcome::SuccessPartial);
        assert_eq!(report.matched_text, "A or B");
        assert!(report.value.is_some());
    }

    #[test]
    fn test_strict_mode_reports_trailing_input() {
        let report = run(
            &ParseRequest::new(GrammarKind::Formula),
            "A or B)",
            &prefs(true, false),
        );
        assert_eq!(report.outcome, ParseOutcome::Fail);
        assert_eq!(report.matched_length, 0);
        assert_matches!(
            report.error,
            Some(ReportedError { code, offset: 6, .. }) if code == codes::syntax::TRAILING_INPUT
        );
        assert!(report.value.is_none());
    }

    #[test]
    fn test_syntax_error_keeps_its_code() {
        let report = run(
            &ParseRequest::new(GrammarKind::UpdateInterval),
            "30s;",
            &prefs(true, true),
        );
        let error = report.error.unwrap();
        assert_eq!(error.code, codes::syntax::UNEXPECTED_END);
        assert_eq!(error.message, "unexpected end of interval");
        assert_eq!(error.offset, 4);
    }

    #[test]
    fn test_semantic_issues_are_attached() {
        let report = run(
            &ParseRequest::new(GrammarKind::UpdateInterval),
            "0;h25",
            &prefs(true, true),
        );
        assert_eq!(report.outcome, ParseOutcome::Success);
        assert!(report.issues.iter().any(|i| i.severity == IssueSeverity::Error));
        assert!(!report.is_ok());

        let skipped = run(
            &ParseRequest::new(GrammarKind::UpdateInterval),
            "0;h25",
            &prefs(true, false),
        );
        assert!(skipped.issues.is_empty());
    }

    #[test]
    fn test_results_reach_the_global_logger() {
        use crate::logging::{LogLevel, Logger, LoggingService, MemoryLogger};
        use std::sync::Arc;

        let memory = Arc::new(MemoryLogger::new());
        let sink: Arc<dyn Logger> = memory.clone();
        crate::logging::init_global_logging_with_service(Arc::new(LoggingService::new(
            sink,
            LogLevel::Debug,
        )))
        .unwrap();

        run(
            &ParseRequest::new(GrammarKind::UpdateInterval),
            "0;h25",
            &prefs(true, true),
        );
        assert!(memory.has_event_with_code(codes::success::PARSE_COMPLETE));
        assert!(memory.has_event_with_code(codes::semantic::VALUE_OUT_OF_RANGE));

        run(
            &ParseRequest::new(GrammarKind::Formula),
            "A or B)",
            &prefs(true, false),
        );
        assert!(memory.has_event_with_code(codes::syntax::TRAILING_INPUT));

        run(
            &ParseRequest::new(GrammarKind::Flexible),
            "50/1,00:00-24:00",
            &prefs(true, true),
        );
        assert!(memory.has_event_with_code(codes::success::VALIDATION_PASSED));
    }

    #[test]
    fn test_range_list_paths() {
        let report = run(
            &ParseRequest::new(GrammarKind::StatusCodes),
            "200,500-400",
            &prefs(true, true),
        );
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "ranges/2");
    }

    #[test]
    fn test_builtin_macro_uses_request_names() {
        let mut request = ParseRequest::new(GrammarKind::Macro);
        request.macro_names = vec!["HOST.HOST".to_string()];
        request.reference = ReferenceMode::Numeric;

        let report = run(&request, "{HOST.HOST2}", &prefs(true, false));
        assert_eq!(report.outcome, ParseOutcome::Success);
        let value = report.value.unwrap();
        assert_eq!(value["name"], "HOST.HOST");
    }

    #[test]
    fn test_offset_is_respected() {
        let report = run(
            &ParseRequest::new(GrammarKind::Ipv4).at(4),
            "ip: 10.0.0.1",
            &prefs(true, false),
        );
        assert_eq!(report.start, 4);
        assert_eq!(report.matched_text, "10.0.0.1");
    }

    #[test]
    fn test_report_serializes() {
        let report = run(
            &ParseRequest::new(GrammarKind::Rules),
            "required|fatal",
            &prefs(true, false),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["grammar"], "rules");
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["value"]["directives"][0]["directive"], "required");
    }
}
