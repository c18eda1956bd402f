//! Simple intervals: `30`, `5m`, `1d`, or a macro

use super::TimeUnit;
use crate::lexical::{peek, scan_digits};
use crate::macros::{scan_macro_operand, MacroOptions};
use crate::syntax::{Parser, Scanned, SyntaxError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleIntervalOptions {
    /// Accept a leading minus sign
    pub allow_negative: bool,
    /// Accept the calendar suffixes `M` and `y`
    pub with_year: bool,
    pub macros: MacroOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimpleInterval {
    Literal {
        /// Number as written, sign and leading zeros included
        text: String,
        magnitude: i64,
        /// `None` when no suffix was written, meaning seconds
        unit: Option<TimeUnit>,
    },
    Macro { text: String },
}

impl SimpleInterval {
    /// Length in seconds; `None` for macros and on overflow
    pub fn to_seconds(&self) -> Option<i64> {
        match self {
            SimpleInterval::Literal { magnitude, unit, .. } => {
                let factor = i64::try_from(unit.unwrap_or(TimeUnit::Second).seconds()).ok()?;
                magnitude.checked_mul(factor)
            }
            SimpleInterval::Macro { .. } => None,
        }
    }
}

impl fmt::Display for SimpleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleInterval::Literal { text, unit, .. } => {
                write!(f, "{}", text)?;
                if let Some(unit) = unit {
                    write!(f, "{}", unit)?;
                }
                Ok(())
            }
            SimpleInterval::Macro { text } => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleIntervalParser {
    options: SimpleIntervalOptions,
}

impl SimpleIntervalParser {
    pub fn new(options: SimpleIntervalOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SimpleIntervalOptions {
        self.options
    }

    fn accepts(&self, unit: TimeUnit) -> bool {
        self.options.with_year || !unit.is_calendar()
    }
}

impl Parser for SimpleIntervalParser {
    type Output = SimpleInterval;

    fn scan(&self, source: &str, start: usize) -> Scanned<SimpleInterval> {
        if let Some(result) = scan_macro_operand(source, start, self.options.macros) {
            return result.map(|end| {
                (
                    end,
                    SimpleInterval::Macro {
                        text: source[start..end].to_string(),
                    },
                )
            });
        }

        let digits_start = if self.options.allow_negative && peek(source, start) == Some(b'-') {
            start + 1
        } else {
            start
        };
        let digits_end = scan_digits(source, digits_start);
        if digits_end == digits_start {
            return Err(SyntaxError::at(source, digits_start));
        }
        let text = &source[start..digits_end];
        let magnitude = text
            .parse::<i64>()
            .map_err(|_| SyntaxError::at(source, start))?;

        let unit = peek(source, digits_end)
            .and_then(TimeUnit::from_suffix)
            .filter(|unit| self.accepts(*unit));
        let end = if unit.is_some() { digits_end + 1 } else { digits_end };

        Ok((
            end,
            SimpleInterval::Literal {
                text: text.to_string(),
                magnitude,
                unit,
            },
        ))
    }
}
