//! Regex replacement tokens `\0` through `\9`

use crate::lexical::peek;
use crate::syntax::{Parser, Scanned, SyntaxError};
use serde::Serialize;

/// Capture group reference inside a substitution body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub index: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplacementParser;

impl Parser for ReplacementParser {
    type Output = Replacement;

    fn scan(&self, source: &str, start: usize) -> Scanned<Replacement> {
        if peek(source, start) != Some(b'\\') {
            return Err(SyntaxError::at(source, start));
        }

        match peek(source, start + 1) {
            Some(b @ b'0'..=b'9') => Ok((start + 2, Replacement { index: b - b'0' })),
            _ => Err(SyntaxError::at(source, start + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseOutcome;

    #[test]
    fn test_single_digit_replacement() {
        let parsed = ReplacementParser.parse(r"\1", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::Success);
        assert_eq!(parsed.value(), Some(&Replacement { index: 1 }));
    }

    #[test]
    fn test_second_digit_is_not_consumed() {
        let parsed = ReplacementParser.parse(r"x\12", 1);
        assert_eq!(parsed.outcome(), ParseOutcome::SuccessPartial);
        assert_eq!(parsed.matched_text(), r"\1");
        assert_eq!(parsed.remainder(), "2");
    }

    #[test]
    fn test_backslash_without_digit() {
        let parsed = ReplacementParser.parse(r"\n", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(1));

        let parsed = ReplacementParser.parse(r"\", 0);
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("unexpected end of string".to_string())
        );
    }
}
