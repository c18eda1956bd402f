//! Custom interval lists and the update interval grammar

use super::scheduling::clause_at;
use super::{FlexibleIntervalParser, Interval, SchedulingIntervalParser};
use crate::config::compile_time::interval::MAX_CUSTOM_INTERVALS;
use crate::lexical::{detect_macro, peek};
use crate::macros::MacroOptions;
use crate::syntax::{Parser, Scanned, SyntaxError};
use crate::time::{SimpleInterval, SimpleIntervalOptions, SimpleIntervalParser};
use serde::Serialize;
use std::fmt;

/// `entry (";" entry)*` of flexible and scheduling intervals
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomIntervalsParser {
    macros: MacroOptions,
}

impl CustomIntervalsParser {
    pub fn new(macros: MacroOptions) -> Self {
        Self { macros }
    }

    /// One entry, chosen by its first character with no backtracking
    fn scan_entry(&self, source: &str, pos: usize) -> Scanned<Interval> {
        let flexible = peek(source, pos).is_some_and(|b| b.is_ascii_digit())
            || detect_macro(source, pos).is_some();

        if flexible {
            FlexibleIntervalParser::new(self.macros)
                .scan(source, pos)
                .map(|(end, interval)| (end, Interval::Flexible(interval)))
        } else if clause_at(source, pos).is_some() {
            SchedulingIntervalParser
                .scan(source, pos)
                .map(|(end, interval)| (end, Interval::Scheduling(interval)))
        } else {
            Err(SyntaxError::at_interval(source, pos))
        }
    }
}

impl Parser for CustomIntervalsParser {
    type Output = Vec<Interval>;

    fn scan(&self, source: &str, start: usize) -> Scanned<Vec<Interval>> {
        let mut intervals = Vec::new();
        let mut pos = start;

        loop {
            if intervals.len() == MAX_CUSTOM_INTERVALS {
                return Err(SyntaxError::at_interval(source, pos));
            }
            let (end, interval) = self.scan_entry(source, pos)?;
            intervals.push(interval);

            if peek(source, end) != Some(b';') {
                return Ok((end, intervals));
            }
            pos = end + 1;
        }
    }
}

/// `SIMPLE_INTERVAL [";" custom intervals]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateInterval {
    pub delay: SimpleInterval,
    pub intervals: Vec<Interval>,
}

impl UpdateInterval {
    pub fn flexible(&self) -> impl Iterator<Item = &super::FlexibleInterval> {
        self.intervals.iter().filter_map(|interval| match interval {
            Interval::Flexible(flexible) => Some(flexible),
            Interval::Scheduling(_) => None,
        })
    }

    pub fn has_scheduling(&self) -> bool {
        self.intervals
            .iter()
            .any(|interval| matches!(interval, Interval::Scheduling(_)))
    }
}

impl fmt::Display for UpdateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.delay)?;
        for interval in &self.intervals {
            write!(f, ";{}", interval)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateIntervalParser {
    macros: MacroOptions,
}

impl UpdateIntervalParser {
    pub fn new(macros: MacroOptions) -> Self {
        Self { macros }
    }
}

impl Parser for UpdateIntervalParser {
    type Output = UpdateInterval;

    fn scan(&self, source: &str, start: usize) -> Scanned<UpdateInterval> {
        let delay_parser = SimpleIntervalParser::new(SimpleIntervalOptions {
            allow_negative: false,
            with_year: false,
            macros: self.macros,
        });
        let (end, delay) = delay_parser
            .scan(source, start)
            .map_err(|err| SyntaxError::at_interval(source, err.offset()))?;

        // The separator commits to at least one custom interval
        if peek(source, end) != Some(b';') {
            return Ok((
                end,
                UpdateInterval {
                    delay,
                    intervals: Vec::new(),
                },
            ));
        }
        let (end, intervals) = CustomIntervalsParser::new(self.macros).scan(source, end + 1)?;

        Ok((end, UpdateInterval { delay, intervals }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ParseOutcome, Subject};
    use assert_matches::assert_matches;

    #[test]
    fn test_plain_delay() {
        let parsed = UpdateIntervalParser::default().parse("5m", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::Success);
        let value = parsed.into_value().unwrap();
        assert_eq!(value.delay.to_seconds(), Some(300));
        assert!(value.intervals.is_empty());
    }

    #[test]
    fn test_mixed_custom_intervals() {
        let source = "0;50/1-5,09:00-18:00;wd1-5h9;md1/1";
        let parsed = UpdateIntervalParser::default().parse(source, 0);
        assert!(parsed.is_full());

        let value = parsed.into_value().unwrap();
        assert_eq!(value.intervals.len(), 3);
        assert_matches!(value.intervals[0], Interval::Flexible(_));
        assert_matches!(value.intervals[1], Interval::Scheduling(_));
        assert_eq!(value.flexible().count(), 1);
        assert!(value.has_scheduling());
        assert_eq!(value.to_string(), source);
    }

    #[test]
    fn test_renders_as_written() {
        for source in ["030s;h9", "05m", "00;50/1,00:00-24:00"] {
            let parsed = UpdateIntervalParser::default().parse(source, 0);
            assert!(parsed.is_full(), "{}", source);
            assert_eq!(parsed.into_value().map(|v| v.to_string()), Some(source.to_string()));
        }
    }

    #[test]
    fn test_separator_requires_entry() {
        let parsed = UpdateIntervalParser::default().parse("30s;", 0);
        assert_matches!(
            parsed.error(),
            Some(SyntaxError::UnexpectedEnd {
                subject: Subject::Interval,
                offset: 4
            })
        );
    }

    #[test]
    fn test_unknown_entry_fails_at_entry() {
        let parsed = UpdateIntervalParser::default().parse("30s;x", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(4));
    }

    #[test]
    fn test_error_inside_entry_is_exact() {
        let parsed = UpdateIntervalParser::default().parse("1h;md1-31/0000", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(12));
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("incorrect syntax near \"00\"".to_string())
        );
    }

    #[test]
    fn test_missing_delay_is_an_interval_error() {
        let parsed = UpdateIntervalParser::default().parse("", 0);
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("unexpected end of interval".to_string())
        );
    }

    #[test]
    fn test_user_macro_delay() {
        let parser = UpdateIntervalParser::new(MacroOptions::user());
        let parsed = parser.parse("{$DELAY};{$FLEX}/{$PERIOD}", 0);
        assert!(parsed.is_full());
    }

    #[test]
    fn test_list_splits_at_matched_boundaries() {
        let source = "50/1,00:00-24:00;h9";
        let parsed = CustomIntervalsParser::default().parse(source, 0);
        assert!(parsed.is_full());

        let first = FlexibleIntervalParser::default().parse(source, 0);
        assert_eq!(first.outcome(), ParseOutcome::SuccessPartial);
        let rest = CustomIntervalsParser::default().parse(source, first.end() + 1);
        assert!(rest.is_full());
    }
}
