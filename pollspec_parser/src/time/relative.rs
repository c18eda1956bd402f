//! Relative time: `now` followed by precision and offset tokens
//!
//! `now/d-1h` means "start of today, minus one hour". The parser only
//! produces the token sequence; [`RelativeTime::apply`] evaluates it
//! against an instant chosen by the caller.

use super::TimeUnit;
use crate::lexical::{peek, scan_digits, starts_with_at};
use crate::syntax::{Parser, Scanned, SyntaxError};
use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Plus,
    Minus,
}

/// One step of a relative time expression, applied left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeToken {
    /// Truncate to the start of `unit`
    Precision { unit: TimeUnit },
    /// Shift by `magnitude` units
    Offset {
        sign: Sign,
        magnitude: u64,
        unit: TimeUnit,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeTime {
    pub tokens: Vec<TimeToken>,
}

impl RelativeTime {
    /// Evaluate the tokens starting from `base`; `None` when the result
    /// leaves the representable calendar
    pub fn apply(&self, base: NaiveDateTime) -> Option<NaiveDateTime> {
        self.tokens.iter().try_fold(base, |time, token| match *token {
            TimeToken::Precision { unit } => truncate(time, unit),
            TimeToken::Offset {
                sign,
                magnitude,
                unit,
            } => shift(time, sign, magnitude, unit),
        })
    }
}

fn truncate(time: NaiveDateTime, unit: TimeUnit) -> Option<NaiveDateTime> {
    let date = time.date();
    match unit {
        TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0),
        TimeUnit::Month => date.with_day(1)?.and_hms_opt(0, 0, 0),
        TimeUnit::Week => {
            let monday = date.weekday().num_days_from_monday();
            date.checked_sub_days(Days::new(u64::from(monday)))?
                .and_hms_opt(0, 0, 0)
        }
        TimeUnit::Day => date.and_hms_opt(0, 0, 0),
        TimeUnit::Hour => date.and_hms_opt(time.hour(), 0, 0),
        TimeUnit::Minute => date.and_hms_opt(time.hour(), time.minute(), 0),
        TimeUnit::Second => time.with_nanosecond(0),
    }
}

fn shift(time: NaiveDateTime, sign: Sign, magnitude: u64, unit: TimeUnit) -> Option<NaiveDateTime> {
    if unit.is_calendar() {
        let months = match unit {
            TimeUnit::Year => magnitude.checked_mul(12)?,
            _ => magnitude,
        };
        let months = Months::new(u32::try_from(months).ok()?);
        return match sign {
            Sign::Plus => time.checked_add_months(months),
            Sign::Minus => time.checked_sub_months(months),
        };
    }

    let seconds = i64::try_from(magnitude.checked_mul(unit.seconds())?).ok()?;
    let delta = Duration::try_seconds(seconds)?;
    match sign {
        Sign::Plus => time.checked_add_signed(delta),
        Sign::Minus => time.checked_sub_signed(delta),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeTimeParser;

impl Parser for RelativeTimeParser {
    type Output = RelativeTime;

    fn scan(&self, source: &str, start: usize) -> Scanned<RelativeTime> {
        if !starts_with_at(source, start, "now") {
            return Err(SyntaxError::at(source, start));
        }

        let mut tokens = Vec::new();
        let mut pos = start + 3;

        loop {
            match peek(source, pos) {
                Some(b'/') => {
                    let unit = peek(source, pos + 1)
                        .and_then(TimeUnit::from_suffix)
                        .ok_or_else(|| SyntaxError::at(source, pos + 1))?;
                    tokens.push(TimeToken::Precision { unit });
                    pos += 2;
                }
                Some(b @ (b'+' | b'-')) => {
                    let sign = if b == b'+' { Sign::Plus } else { Sign::Minus };
                    let digits_start = pos + 1;
                    let digits_end = scan_digits(source, digits_start);
                    if digits_end == digits_start {
                        return Err(SyntaxError::at(source, digits_start));
                    }
                    let magnitude = source[digits_start..digits_end]
                        .parse::<u64>()
                        .map_err(|_| SyntaxError::at(source, digits_start))?;

                    let (unit, end) = match peek(source, digits_end).and_then(TimeUnit::from_suffix)
                    {
                        Some(unit) => (unit, digits_end + 1),
                        None => (TimeUnit::Second, digits_end),
                    };
                    tokens.push(TimeToken::Offset {
                        sign,
                        magnitude,
                        unit,
                    });
                    pos = end;
                }
                _ => break,
            }
        }

        Ok((pos, RelativeTime { tokens }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseOutcome;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn test_precision_then_offset() {
        let parsed = RelativeTimeParser.parse("now/M-1y", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::Success);
        assert_eq!(
            parsed.into_value().map(|t| t.tokens),
            Some(vec![
                TimeToken::Precision {
                    unit: TimeUnit::Month
                },
                TimeToken::Offset {
                    sign: Sign::Minus,
                    magnitude: 1,
                    unit: TimeUnit::Year
                },
            ])
        );
    }

    #[test]
    fn test_bare_offset_defaults_to_seconds() {
        let tokens = RelativeTimeParser.parse("now+30", 0).into_value().unwrap().tokens;
        assert_eq!(
            tokens,
            vec![TimeToken::Offset {
                sign: Sign::Plus,
                magnitude: 30,
                unit: TimeUnit::Second
            }]
        );
    }

    #[test]
    fn test_plain_now() {
        let parsed = RelativeTimeParser.parse("now", 0);
        assert!(parsed.is_full());
        assert_eq!(parsed.value().map(|t| t.tokens.len()), Some(0));
    }

    #[test]
    fn test_incomplete_token_fails() {
        let parsed = RelativeTimeParser.parse("now-", 0);
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("unexpected end of string".to_string())
        );

        let parsed = RelativeTimeParser.parse("now/x", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(4));
    }

    #[test]
    fn test_foreign_suffix_is_partial() {
        let parsed = RelativeTimeParser.parse("now-1d to now", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::SuccessPartial);
        assert_eq!(parsed.matched_text(), "now-1d");
    }

    #[test]
    fn test_apply_in_order() {
        let base = at(2018, 4, 15, 12, 45, 34);

        let time = RelativeTimeParser.parse("now/M-1y", 0).into_value().unwrap();
        assert_eq!(time.apply(base), Some(at(2017, 4, 1, 0, 0, 0)));

        let time = RelativeTimeParser.parse("now-1y/M", 0).into_value().unwrap();
        assert_eq!(time.apply(base), Some(at(2017, 4, 1, 0, 0, 0)));

        let time = RelativeTimeParser.parse("now/d+90m", 0).into_value().unwrap();
        assert_eq!(time.apply(base), Some(at(2018, 4, 15, 1, 30, 0)));
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2018-04-15 is a Sunday
        let time = RelativeTimeParser.parse("now/w", 0).into_value().unwrap();
        assert_eq!(
            time.apply(at(2018, 4, 15, 12, 0, 0)),
            Some(at(2018, 4, 9, 0, 0, 0))
        );
    }

    #[test]
    fn test_month_offset_clamps_to_month_end() {
        let time = RelativeTimeParser.parse("now-1M", 0).into_value().unwrap();
        assert_eq!(
            time.apply(at(2018, 3, 31, 8, 0, 0)),
            Some(at(2018, 2, 28, 8, 0, 0))
        );
    }

    #[test]
    fn test_apply_overflow_is_none() {
        let time = RelativeTimeParser
            .parse("now+99999999999y", 0)
            .into_value()
            .unwrap();
        assert_eq!(time.apply(at(2018, 1, 1, 0, 0, 0)), None);
    }
}
