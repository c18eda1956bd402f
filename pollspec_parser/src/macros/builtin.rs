//! Built-in macros from a fixed name table
//!
//! `{HOST.NAME}`, `{HOST.HOST2}` and `{EVENT.TAGS."Service"}` all come from
//! the same grammar; what may follow the name is chosen by the caller
//! through [`ReferenceMode`].

use super::{MacroMatch, MacroReference};
use crate::lexical::{peek, scan_quoted_context, scan_while, starts_with_at};
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};
use serde::{Deserialize, Serialize};

/// What may follow a built-in macro name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Name only: `{HOST.NAME}`
    #[default]
    None,
    /// Optional single digit 1-9: `{HOST.HOST2}`
    Numeric,
    /// Required `.` plus a quoted string or identifier: `{EVENT.TAGS."x"}`
    String,
}

/// Parser for `{NAME}` macros drawn from a fixed table
#[derive(Debug, Clone)]
pub struct MacroParser {
    names: Vec<String>,
    mode: ReferenceMode,
}

impl MacroParser {
    /// Build a parser from its name table; longer names are tried first
    pub fn new<I, S>(names: I, mode: ReferenceMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        Self { names, mode }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mode(&self) -> ReferenceMode {
        self.mode
    }

    fn scan_reference(
        &self,
        source: &str,
        pos: usize,
    ) -> SyntaxResult<(usize, Option<MacroReference>)> {
        match self.mode {
            ReferenceMode::None => Ok((pos, None)),
            ReferenceMode::Numeric => match peek(source, pos) {
                Some(b @ b'1'..=b'9') => Ok((pos + 1, Some(MacroReference::Numeric(b - b'0')))),
                _ => Ok((pos, None)),
            },
            ReferenceMode::String => {
                if peek(source, pos) != Some(b'.') {
                    return Err(SyntaxError::at(source, pos));
                }
                let value_start = pos + 1;
                if peek(source, value_start) == Some(b'"') {
                    let (end, value) = scan_quoted_context(source, value_start)?;
                    return Ok((end, Some(MacroReference::String(value))));
                }

                let end = scan_while(source, value_start, |b| {
                    b.is_ascii_alphanumeric() || b == b'_'
                });
                if end == value_start {
                    return Err(SyntaxError::at(source, value_start));
                }
                Ok((
                    end,
                    Some(MacroReference::String(source[value_start..end].to_string())),
                ))
            }
        }
    }

    fn scan_named(&self, source: &str, start: usize, name: &str) -> Scanned<MacroMatch> {
        let (end, reference) = self.scan_reference(source, start + 1 + name.len())?;
        if peek(source, end) != Some(b'}') {
            return Err(SyntaxError::at(source, end));
        }

        let mut matched = MacroMatch::named(name);
        matched.reference = reference;
        Ok((end + 1, matched))
    }
}

impl Parser for MacroParser {
    type Output = MacroMatch;

    fn scan(&self, source: &str, start: usize) -> Scanned<MacroMatch> {
        if peek(source, start) != Some(b'{') {
            return Err(SyntaxError::at(source, start));
        }

        // Report the error that got furthest into the input
        let mut furthest: Option<SyntaxError> = None;
        for name in self.names.iter().filter(|n| starts_with_at(source, start + 1, n)) {
            match self.scan_named(source, start, name) {
                Ok(found) => return Ok(found),
                Err(err) => {
                    if furthest.as_ref().map_or(true, |f| err.offset() > f.offset()) {
                        furthest = Some(err);
                    }
                }
            }
        }

        Err(furthest.unwrap_or_else(|| SyntaxError::at(source, start + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseOutcome;
    use assert_matches::assert_matches;

    fn host_macros(mode: ReferenceMode) -> MacroParser {
        MacroParser::new(["HOST", "HOST.HOST", "HOST.NAME", "HOST.IP"], mode)
    }

    #[test]
    fn test_names_sorted_longest_first() {
        let parser = host_macros(ReferenceMode::None);
        assert_eq!(parser.names()[0].len(), 9);
        assert_eq!(parser.names().last().map(String::as_str), Some("HOST"));
    }

    #[test]
    fn test_plain_builtin_macro() {
        let parsed = host_macros(ReferenceMode::None).parse("{HOST.NAME} is down", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::SuccessPartial);
        assert_eq!(parsed.matched_text(), "{HOST.NAME}");
        assert_eq!(parsed.value().map(|m| m.name.as_str()), Some("HOST.NAME"));
    }

    #[test]
    fn test_numeric_reference() {
        let parser = host_macros(ReferenceMode::Numeric);

        let parsed = parser.parse("{HOST.HOST2}", 0);
        assert!(parsed.is_full());
        let value = parsed.into_value().unwrap();
        assert_eq!(value.name, "HOST.HOST");
        assert_eq!(value.reference, Some(MacroReference::Numeric(2)));

        let parsed = parser.parse("{HOST.IP}", 0);
        assert_eq!(parsed.value().and_then(|m| m.reference.clone()), None);
    }

    #[test]
    fn test_numeric_reference_rejects_zero_and_two_digits() {
        let parser = host_macros(ReferenceMode::Numeric);

        let parsed = parser.parse("{HOST.HOST0}", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(10));

        let parsed = parser.parse("{HOST.HOST12}", 0);
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("incorrect syntax near \"2}\"".to_string())
        );
    }

    #[test]
    fn test_numeric_mode_is_not_used_without_request() {
        let parsed = host_macros(ReferenceMode::None).parse("{HOST.HOST2}", 0);
        assert!(parsed.is_fail());
    }

    #[test]
    fn test_string_reference() {
        let parser = MacroParser::new(["EVENT.TAGS"], ReferenceMode::String);

        let parsed = parser.parse(r#"{EVENT.TAGS."Service name"}"#, 0);
        assert_eq!(
            parsed.into_value().and_then(|m| m.reference),
            Some(MacroReference::String("Service name".to_string()))
        );

        let parsed = parser.parse("{EVENT.TAGS.scope_1}", 0);
        assert_eq!(
            parsed.into_value().and_then(|m| m.reference),
            Some(MacroReference::String("scope_1".to_string()))
        );

        assert_matches!(
            parser.parse("{EVENT.TAGS}", 0).error(),
            Some(SyntaxError::IncorrectSyntax { offset: 11, .. })
        );
    }

    #[test]
    fn test_unknown_name_fails_after_brace() {
        let parsed = host_macros(ReferenceMode::None).parse("{ITEM.VALUE}", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(1));
        assert_eq!(parsed.matched_length(), 0);
    }
}
