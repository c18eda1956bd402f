//! Numeric ranges, status code ranges and comma-separated range lists

use super::{scan_operand, Operand};
use crate::lexical::{peek, scan_digits, scan_digits_limited, skip_whitespace};
use crate::macros::MacroOptions;
use crate::syntax::{Parser, Scanned, SyntaxError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options shared by the range grammars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOptions {
    pub allow_negative: bool,
    pub macros: MacroOptions,
}

/// `N` or `N-N`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumericRange {
    pub from: Operand<i64>,
    pub till: Option<Operand<i64>>,
}

impl NumericRange {
    /// Literal bounds, with a single value standing for both ends
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let from = *self.from.literal()?;
        let till = match &self.till {
            Some(till) => *till.literal()?,
            None => from,
        };
        Some((from, till))
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bound(f: &mut fmt::Formatter<'_>, operand: &Operand<i64>) -> fmt::Result {
            match operand {
                Operand::Literal(value) => write!(f, "{}", value),
                Operand::Macro(text) => write!(f, "{}", text),
            }
        }

        bound(f, &self.from)?;
        if let Some(till) = &self.till {
            write!(f, "-")?;
            bound(f, till)?;
        }
        Ok(())
    }
}

/// Bound grammar shared by numeric and status code ranges
#[derive(Debug, Clone, Copy)]
struct BoundGrammar {
    allow_negative: bool,
    max_digits: Option<usize>,
    macros: MacroOptions,
}

impl BoundGrammar {
    fn scan_bound(&self, source: &str, start: usize) -> Scanned<Operand<i64>> {
        scan_operand(source, start, self.macros, || {
            let digits_start = if self.allow_negative && peek(source, start) == Some(b'-') {
                start + 1
            } else {
                start
            };

            let end = match self.max_digits {
                Some(max) => scan_digits_limited(source, digits_start, max)
                    .map_err(|excess| SyntaxError::at(source, excess))?,
                None => scan_digits(source, digits_start),
            };
            if end == digits_start {
                return Err(SyntaxError::at(source, digits_start));
            }

            let value = source[start..end]
                .parse::<i64>()
                .map_err(|_| SyntaxError::at(source, start))?;
            Ok((end, value))
        })
    }

    fn scan_range(&self, source: &str, start: usize) -> Scanned<NumericRange> {
        let (end, from) = self.scan_bound(source, start)?;

        // A dash commits to the upper bound
        if peek(source, end) != Some(b'-') {
            return Ok((end, NumericRange { from, till: None }));
        }
        let (end, till) = self.scan_bound(source, end + 1)?;

        Ok((
            end,
            NumericRange {
                from,
                till: Some(till),
            },
        ))
    }
}

/// Parser for `N` and `N-N` integer ranges
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericRangeParser {
    options: RangeOptions,
}

impl NumericRangeParser {
    pub fn new(options: RangeOptions) -> Self {
        Self { options }
    }
}

impl Parser for NumericRangeParser {
    type Output = NumericRange;

    fn scan(&self, source: &str, start: usize) -> Scanned<NumericRange> {
        BoundGrammar {
            allow_negative: self.options.allow_negative,
            max_digits: None,
            macros: self.options.macros,
        }
        .scan_range(source, start)
    }
}

/// Parser for HTTP status codes and code ranges such as `200-299`
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeRangeParser {
    macros: MacroOptions,
}

impl StatusCodeRangeParser {
    pub fn new(macros: MacroOptions) -> Self {
        Self { macros }
    }
}

impl Parser for StatusCodeRangeParser {
    type Output = NumericRange;

    fn scan(&self, source: &str, start: usize) -> Scanned<NumericRange> {
        BoundGrammar {
            allow_negative: false,
            max_digits: Some(3),
            macros: self.macros,
        }
        .scan_range(source, start)
    }
}

/// Comma-separated list of ranges, whitespace allowed around items
#[derive(Debug, Clone, Copy, Default)]
pub struct RangesParser<P> {
    inner: P,
}

impl<P> RangesParser<P>
where
    P: Parser<Output = NumericRange>,
{
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P> Parser for RangesParser<P>
where
    P: Parser<Output = NumericRange>,
{
    type Output = Vec<NumericRange>;

    fn scan(&self, source: &str, start: usize) -> Scanned<Vec<NumericRange>> {
        let mut ranges = Vec::new();
        let mut pos = skip_whitespace(source, start);

        loop {
            let (end, range) = self.inner.scan(source, pos)?;
            ranges.push(range);

            let after = skip_whitespace(source, end);
            if peek(source, after) != Some(b',') {
                // Trailing whitespace is consumed only at the end of input
                let end = if after == source.len() { after } else { end };
                return Ok((end, ranges));
            }
            pos = skip_whitespace(source, after + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseOutcome;
    use assert_matches::assert_matches;

    fn literal(from: i64, till: Option<i64>) -> NumericRange {
        NumericRange {
            from: Operand::Literal(from),
            till: till.map(Operand::Literal),
        }
    }

    #[test]
    fn test_single_value_and_range() {
        let parser = NumericRangeParser::default();
        assert_eq!(parser.parse("42", 0).into_value(), Some(literal(42, None)));
        assert_eq!(
            parser.parse("10-20", 0).into_value(),
            Some(literal(10, Some(20)))
        );
    }

    #[test]
    fn test_negative_bounds_need_permission() {
        let parsed = NumericRangeParser::default().parse("-5", 0);
        assert!(parsed.is_fail());

        let parser = NumericRangeParser::new(RangeOptions {
            allow_negative: true,
            ..Default::default()
        });
        assert_eq!(
            parser.parse("-5--1", 0).into_value(),
            Some(literal(-5, Some(-1)))
        );
    }

    #[test]
    fn test_dash_commits_to_upper_bound() {
        let parsed = NumericRangeParser::default().parse("10-", 0);
        assert_matches!(parsed.error(), Some(SyntaxError::UnexpectedEnd { .. }));

        let parsed = NumericRangeParser::default().parse("10-x", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(3));
    }

    #[test]
    fn test_overflowing_bound_fails_at_bound() {
        let parsed = NumericRangeParser::default().parse("1-99999999999999999999", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(2));
    }

    #[test]
    fn test_macro_bounds() {
        let parser = NumericRangeParser::new(RangeOptions {
            allow_negative: false,
            macros: MacroOptions::user(),
        });
        let range = parser.parse("1-{$MAX}", 0).into_value().unwrap();
        assert_eq!(range.till, Some(Operand::Macro("{$MAX}".to_string())));
        assert_eq!(range.bounds(), None);
        assert_eq!(range.to_string(), "1-{$MAX}");
    }

    #[test]
    fn test_status_codes_are_three_digits() {
        let parser = StatusCodeRangeParser::default();
        assert_eq!(
            parser.parse("200-299", 0).into_value().and_then(|r| r.bounds()),
            Some((200, 299))
        );
        assert_eq!(
            parser.parse("2000", 0).error().map(|e| e.offset()),
            Some(3)
        );
    }

    #[test]
    fn test_range_list() {
        let parser = RangesParser::new(StatusCodeRangeParser::default());
        let parsed = parser.parse("200, 301-308 ,404", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::Success);
        assert_eq!(parsed.value().map(Vec::len), Some(3));
    }

    #[test]
    fn test_range_list_stops_before_foreign_text() {
        let parser = RangesParser::new(NumericRangeParser::default());
        let parsed = parser.parse("1-5,7 end", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::SuccessPartial);
        assert_eq!(parsed.matched_text(), "1-5,7");

        // Each matched item parses on its own at its offset
        assert!(NumericRangeParser::default().parse("1-5,7 end", 4).is_match());
    }

    #[test]
    fn test_range_list_comma_requires_item() {
        let parser = RangesParser::new(NumericRangeParser::default());
        let parsed = parser.parse("1,2,", 0);
        assert_matches!(parsed.error(), Some(SyntaxError::UnexpectedEnd { offset: 4, .. }));
    }
}
