//! The positional parse contract
//!
//! A parser is asked to match its grammar at a byte offset. It never
//! panics and never treats "no match" as exceptional: the answer is a
//! [`Parsed`] that records the outcome, the consumed span, the structured
//! value and, on failure, the positional error.

use super::error::{SyntaxError, SyntaxResult};
use crate::utils::Span;
use serde::Serialize;

/// Result class of a single parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseOutcome {
    /// The grammar does not match at the requested offset
    Fail,
    /// The grammar matched everything from the offset to the end of input
    Success,
    /// A valid prefix matched; trailing input belongs to someone else
    SuccessPartial,
}

/// End offset of the longest valid prefix plus the value built from it
pub type Scanned<T> = SyntaxResult<(usize, T)>;

/// Outcome of parsing `source` from `start`
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<'s, T> {
    source: &'s str,
    start: usize,
    length: usize,
    outcome: ParseOutcome,
    value: Option<T>,
    error: Option<SyntaxError>,
}

impl<'s, T> Parsed<'s, T> {
    /// A match covering `start..end`
    pub fn matched(source: &'s str, start: usize, end: usize, value: T) -> Self {
        let outcome = if end >= source.len() {
            ParseOutcome::Success
        } else {
            ParseOutcome::SuccessPartial
        };

        Self {
            source,
            start,
            length: end.saturating_sub(start),
            outcome,
            value: Some(value),
            error: None,
        }
    }

    /// A failed match; the consumed length is always zero
    pub fn failed(source: &'s str, start: usize, error: SyntaxError) -> Self {
        Self {
            source,
            start,
            length: 0,
            outcome: ParseOutcome::Fail,
            value: None,
            error: Some(error),
        }
    }

    pub fn outcome(&self) -> ParseOutcome {
        self.outcome
    }

    pub fn is_fail(&self) -> bool {
        self.outcome == ParseOutcome::Fail
    }

    /// True for both full and partial matches
    pub fn is_match(&self) -> bool {
        !self.is_fail()
    }

    /// True only when the whole remaining input was consumed
    pub fn is_full(&self) -> bool {
        self.outcome == ParseOutcome::Success
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn matched_length(&self) -> usize {
        self.length
    }

    /// Text consumed by the match; empty on failure
    pub fn matched_text(&self) -> &'s str {
        self.source.get(self.start..self.end()).unwrap_or("")
    }

    /// Input left after the match
    pub fn remainder(&self) -> &'s str {
        self.source.get(self.end()..).unwrap_or("")
    }

    pub fn span(&self) -> Span {
        Span::locate(self.source, self.start, self.end())
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn error(&self) -> Option<&SyntaxError> {
        self.error.as_ref()
    }

    /// Convert into a plain result, dropping the span
    pub fn into_result(self) -> SyntaxResult<T> {
        match (self.value, self.error) {
            (Some(value), _) => Ok(value),
            (None, Some(error)) => Err(error),
            (None, None) => Err(SyntaxError::at(self.source, self.start)),
        }
    }

    /// Transform the structured value, keeping span and outcome
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<'s, U> {
        Parsed {
            source: self.source,
            start: self.start,
            length: self.length,
            outcome: self.outcome,
            value: self.value.map(f),
            error: self.error,
        }
    }

    /// Treat trailing input as an error at the first unconsumed byte
    pub fn require_full(self) -> Self {
        match self.outcome {
            ParseOutcome::SuccessPartial => {
                let offset = self.end();
                Self::failed(self.source, self.start, SyntaxError::near(self.source, offset))
            }
            _ => self,
        }
    }
}

/// A reusable, immutable parser for one grammar
///
/// Implementors provide [`Parser::scan`], which matches the longest valid
/// prefix at `start` and reports where it ended. [`Parser::parse`] wraps
/// that into the public contract. Parsers compose by calling each other's
/// `scan` at sub-offsets.
pub trait Parser: Send + Sync {
    type Output;

    /// Match at `start`, which is guaranteed to be a char boundary within `source`
    fn scan(&self, source: &str, start: usize) -> Scanned<Self::Output>;

    /// Parse `source` from byte offset `start`
    fn parse<'s>(&self, source: &'s str, start: usize) -> Parsed<'s, Self::Output> {
        if start > source.len() || !source.is_char_boundary(start) {
            return Parsed::failed(source, start, SyntaxError::at(source, start));
        }

        match self.scan(source, start) {
            Ok((end, value)) => Parsed::matched(source, start, end, value),
            Err(error) => Parsed::failed(source, start, error),
        }
    }
}
