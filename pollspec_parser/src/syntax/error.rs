//! Syntax errors shared by the whole parser family
//!
//! Every failure carries the byte offset where the grammar broke and a
//! message quoting the remaining input from that offset, so a form can
//! highlight the exact offending character.

use crate::config::compile_time::syntax::MAX_ERROR_CHUNK_CHARS;
use crate::logging::{codes, Code};
use std::fmt;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// What kind of input ran out, used in "unexpected end of ..." messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    String,
    Interval,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::String => write!(f, "string"),
            Subject::Interval => write!(f, "interval"),
        }
    }
}

/// A positional syntax error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("incorrect syntax near \"{near}\"")]
    IncorrectSyntax { near: String, offset: usize },

    #[error("unexpected end of {subject}")]
    UnexpectedEnd { subject: Subject, offset: usize },

    #[error("nesting deeper than {limit} levels near \"{near}\"")]
    NestingTooDeep {
        limit: usize,
        near: String,
        offset: usize,
    },
}

impl SyntaxError {
    /// Error at `offset`; running off the end reports "unexpected end of string"
    pub fn at(source: &str, offset: usize) -> Self {
        Self::at_subject(source, offset, Subject::String)
    }

    /// Error at `offset` inside an interval grammar
    pub fn at_interval(source: &str, offset: usize) -> Self {
        Self::at_subject(source, offset, Subject::Interval)
    }

    fn at_subject(source: &str, offset: usize, subject: Subject) -> Self {
        if offset >= source.len() {
            Self::UnexpectedEnd {
                subject,
                offset: source.len(),
            }
        } else {
            Self::near(source, offset)
        }
    }

    /// "incorrect syntax near" quoting the input from `offset`
    pub fn near(source: &str, offset: usize) -> Self {
        Self::IncorrectSyntax {
            near: error_chunk(source, offset),
            offset,
        }
    }

    /// Nesting limit exceeded at `offset`
    pub fn nesting_too_deep(source: &str, offset: usize, limit: usize) -> Self {
        Self::NestingTooDeep {
            limit,
            near: error_chunk(source, offset),
            offset,
        }
    }

    /// Byte offset where the grammar broke
    pub fn offset(&self) -> usize {
        match self {
            Self::IncorrectSyntax { offset, .. }
            | Self::UnexpectedEnd { offset, .. }
            | Self::NestingTooDeep { offset, .. } => *offset,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::IncorrectSyntax { .. } => codes::syntax::INCORRECT_SYNTAX,
            Self::UnexpectedEnd { .. } => codes::syntax::UNEXPECTED_END,
            Self::NestingTooDeep { .. } => codes::syntax::NESTING_TOO_DEEP,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

/// Remaining input from `offset`, cut to the configured number of characters
fn error_chunk(source: &str, offset: usize) -> String {
    let rest = source.get(offset..).unwrap_or("");
    match rest.char_indices().nth(MAX_ERROR_CHUNK_CHARS) {
        Some((cut, _)) => format!("{} ...", &rest[..cut]),
        None => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_incorrect_syntax_quotes_suffix() {
        let err = SyntaxError::at("md1-31/0000", 9);
        assert_eq!(err.to_string(), "incorrect syntax near \"00\"");
        assert_eq!(err.offset(), 9);
        assert_eq!(err.error_code(), codes::syntax::INCORRECT_SYNTAX);
    }

    #[test]
    fn test_end_of_input_messages() {
        let err = SyntaxError::at("50/", 3);
        assert_eq!(err.to_string(), "unexpected end of string");

        let err = SyntaxError::at_interval("50/", 3);
        assert_eq!(err.to_string(), "unexpected end of interval");
        assert_matches!(
            err,
            SyntaxError::UnexpectedEnd {
                subject: Subject::Interval,
                offset: 3
            }
        );
    }

    #[test]
    fn test_long_suffix_is_cut() {
        let source = format!("x{}", "y".repeat(MAX_ERROR_CHUNK_CHARS + 5));
        let err = SyntaxError::near(&source, 0);
        let expected = format!("x{} ...", "y".repeat(MAX_ERROR_CHUNK_CHARS - 1));
        assert_matches!(err, SyntaxError::IncorrectSyntax { ref near, .. } if *near == expected);
    }

    #[test]
    fn test_chunk_counts_characters_not_bytes() {
        let source = "ü".repeat(MAX_ERROR_CHUNK_CHARS);
        let err = SyntaxError::near(&source, 0);
        assert_eq!(err.to_string(), format!("incorrect syntax near \"{}\"", source));
    }
}
