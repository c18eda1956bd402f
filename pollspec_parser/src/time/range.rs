//! Range time: an absolute time, a relative time or a macro

use super::{AbsoluteTime, AbsoluteTimeParser, RelativeTime, RelativeTimeParser};
use crate::macros::{scan_macro_operand, MacroOptions};
use crate::syntax::{Parser, Scanned, SyntaxError};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Which grammar matched, with its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RangeTime {
    Absolute(AbsoluteTime),
    Relative(RelativeTime),
    Macro(String),
}

impl RangeTime {
    /// First and last second denoted, evaluating relative time at `now`
    ///
    /// A relative time collapses to a single instant. Macros have no
    /// bounds until expanded.
    pub fn bounds(&self, now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match self {
            RangeTime::Absolute(time) => Some((time.floor, time.ceil)),
            RangeTime::Relative(time) => time.apply(now).map(|instant| (instant, instant)),
            RangeTime::Macro(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeTimeParser {
    macros: MacroOptions,
}

impl RangeTimeParser {
    pub fn new(macros: MacroOptions) -> Self {
        Self { macros }
    }
}

impl Parser for RangeTimeParser {
    type Output = RangeTime;

    fn scan(&self, source: &str, start: usize) -> Scanned<RangeTime> {
        let absolute = match AbsoluteTimeParser.scan(source, start) {
            Ok((end, time)) => return Ok((end, RangeTime::Absolute(time))),
            Err(err) => err,
        };
        let relative = match RelativeTimeParser.scan(source, start) {
            Ok((end, time)) => return Ok((end, RangeTime::Relative(time))),
            Err(err) => err,
        };
        if let Some(result) = scan_macro_operand(source, start, self.macros) {
            return result.map(|end| (end, RangeTime::Macro(source[start..end].to_string())));
        }

        Err(furthest(absolute, relative))
    }
}

fn furthest(a: SyntaxError, b: SyntaxError) -> SyntaxError {
    if b.offset() > a.offset() {
        b
    } else {
        a
    }
}
