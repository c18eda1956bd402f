//! Macro context scanners
//!
//! A user macro context is either unquoted (`{$M:ctx}`) or quoted
//! (`{$M:"ctx"}`). The choice is made by the caller from the first
//! context character; the two escaping rules never mix.

use crate::syntax::{SyntaxError, SyntaxResult};

/// Scan an unquoted context starting at `pos`
///
/// Stops at the first unescaped `}` without consuming it. `\}` and `\\`
/// unescape to `}` and `\`; any other backslash is literal. Returns the
/// offset of the terminating brace and the unescaped text.
pub fn scan_unquoted_context(source: &str, pos: usize) -> SyntaxResult<(usize, String)> {
    let rest = source.get(pos..).unwrap_or("");
    let mut value = String::new();
    let mut chars = rest.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '}' => return Ok((pos + index, value)),
            '\\' => match chars.peek() {
                Some(&(_, next @ ('}' | '\\'))) => {
                    value.push(next);
                    chars.next();
                }
                Some(_) => value.push('\\'),
                None => break,
            },
            _ => value.push(ch),
        }
    }

    Err(SyntaxError::at(source, source.len()))
}

/// Scan a quoted context; `pos` must point at the opening quote
///
/// Returns the offset just past the closing quote and the unescaped text.
/// Only `\"` and `\\` are valid escapes; any other backslash fails at the
/// backslash itself.
pub fn scan_quoted_context(source: &str, pos: usize) -> SyntaxResult<(usize, String)> {
    let rest = source.get(pos..).unwrap_or("");
    let mut chars = rest.char_indices();

    match chars.next() {
        Some((_, '"')) => {}
        _ => return Err(SyntaxError::at(source, pos)),
    }

    let mut value = String::new();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => return Ok((pos + index + 1, value)),
            '\\' => match chars.next() {
                Some((_, next @ ('"' | '\\'))) => value.push(next),
                Some(_) => return Err(SyntaxError::at(source, pos + index)),
                None => break,
            },
            _ => value.push(ch),
        }
    }

    Err(SyntaxError::at(source, source.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_unquoted_context_stops_at_brace() {
        assert_eq!(
            scan_unquoted_context("{$M:ctx}", 4),
            Ok((7, "ctx".to_string()))
        );
    }

    #[test]
    fn test_unquoted_context_escapes() {
        let source = r"{$M:a\}b\\}";
        assert_eq!(
            scan_unquoted_context(source, 4),
            Ok((10, r"a}b\".to_string()))
        );

        let source = r"{$M:a\nb}";
        assert_eq!(scan_unquoted_context(source, 4), Ok((8, r"a\nb".to_string())));
    }

    #[test]
    fn test_unterminated_unquoted_context() {
        assert_matches!(
            scan_unquoted_context("{$M:abc", 4),
            Err(SyntaxError::UnexpectedEnd { offset: 7, .. })
        );
        assert_matches!(
            scan_unquoted_context(r"{$M:abc\", 4),
            Err(SyntaxError::UnexpectedEnd { .. })
        );
    }

    #[test]
    fn test_quoted_context() {
        let source = r#"{$M:"a\"b\\c"}"#;
        assert_eq!(
            scan_quoted_context(source, 4),
            Ok((13, r#"a"b\c"#.to_string()))
        );
    }

    #[test]
    fn test_quoted_context_rejects_unknown_escape_at_backslash() {
        let source = r#"{$M:"a\nb"}"#;
        let err = scan_quoted_context(source, 4).unwrap_err();
        assert_eq!(err.offset(), 6);
        assert_eq!(err.to_string(), r#"incorrect syntax near "\nb"}""#);
    }

    #[test]
    fn test_quoted_context_requires_closing_quote() {
        assert_matches!(
            scan_quoted_context(r#"{$M:"abc}"#, 4),
            Err(SyntaxError::UnexpectedEnd { .. })
        );
    }
}
