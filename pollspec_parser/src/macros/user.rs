//! User macros `{$NAME[:context]}` and discovery macros `{#NAME}`

use super::{is_macro_name_byte, MacroContext, MacroMatch};
use crate::config::compile_time::macros::MAX_MACRO_NAME_LENGTH;
use crate::lexical::{
    peek, scan_quoted_context, scan_unquoted_context, scan_while, skip_whitespace, starts_with_at,
};
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};

/// Parser for `{$NAME}`, `{$NAME:context}` and `{$NAME:"quoted context"}`
#[derive(Debug, Clone, Copy, Default)]
pub struct UserMacroParser;

impl Parser for UserMacroParser {
    type Output = MacroMatch;

    fn scan(&self, source: &str, start: usize) -> Scanned<MacroMatch> {
        if !starts_with_at(source, start, "{$") {
            return Err(SyntaxError::at(source, start));
        }

        let name_start = start + 2;
        let name_end = scan_macro_name(source, name_start)?;
        let name = &source[name_start..name_end];

        match peek(source, name_end) {
            Some(b'}') => Ok((name_end + 1, MacroMatch::named(name))),
            Some(b':') => {
                let context_start = skip_whitespace(source, name_end + 1);
                let (close, context) = if peek(source, context_start) == Some(b'"') {
                    let (end, value) = scan_quoted_context(source, context_start)?;
                    let close = skip_whitespace(source, end);
                    if peek(source, close) != Some(b'}') {
                        return Err(SyntaxError::at(source, close));
                    }
                    (close, MacroContext { value, quoted: true })
                } else {
                    let (close, value) = scan_unquoted_context(source, context_start)?;
                    (close, MacroContext { value, quoted: false })
                };

                let mut matched = MacroMatch::named(name);
                matched.context = Some(context);
                Ok((close + 1, matched))
            }
            _ => Err(SyntaxError::at(source, name_end)),
        }
    }
}

/// Parser for low-level discovery macros `{#NAME}`
#[derive(Debug, Clone, Copy, Default)]
pub struct LldMacroParser;

impl Parser for LldMacroParser {
    type Output = MacroMatch;

    fn scan(&self, source: &str, start: usize) -> Scanned<MacroMatch> {
        if !starts_with_at(source, start, "{#") {
            return Err(SyntaxError::at(source, start));
        }

        let name_start = start + 2;
        let name_end = scan_macro_name(source, name_start)?;

        if peek(source, name_end) != Some(b'}') {
            return Err(SyntaxError::at(source, name_end));
        }

        Ok((
            name_end + 1,
            MacroMatch::named(&source[name_start..name_end]),
        ))
    }
}

/// Scan a non-empty macro name within the configured length
pub(crate) fn scan_macro_name(source: &str, pos: usize) -> SyntaxResult<usize> {
    let end = scan_while(source, pos, is_macro_name_byte);
    if end == pos {
        return Err(SyntaxError::at(source, pos));
    }
    if end - pos > MAX_MACRO_NAME_LENGTH {
        return Err(SyntaxError::at(source, pos + MAX_MACRO_NAME_LENGTH));
    }
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseOutcome;

    #[test]
    fn test_plain_user_macro() {
        let parsed = UserMacroParser.parse("{$SNMP_COMMUNITY}", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::Success);
        assert_eq!(parsed.value().map(|m| m.name.as_str()), Some("SNMP_COMMUNITY"));
        assert_eq!(parsed.value().and_then(|m| m.context.clone()), None);
    }

    #[test]
    fn test_unquoted_context() {
        let parsed = UserMacroParser.parse("{$PORT:eth0}/out", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::SuccessPartial);
        assert_eq!(parsed.matched_text(), "{$PORT:eth0}");
        let context = parsed.into_value().and_then(|m| m.context).unwrap();
        assert_eq!(context.value, "eth0");
        assert!(!context.quoted);
    }

    #[test]
    fn test_quoted_context_with_surrounding_spaces() {
        let parsed = UserMacroParser.parse(r#"{$PORT: "a \"b\"" }"#, 0);
        assert!(parsed.is_full());
        let context = parsed.into_value().and_then(|m| m.context).unwrap();
        assert_eq!(context.value, r#"a "b""#);
        assert!(context.quoted);
    }

    #[test]
    fn test_quoted_context_must_close_macro() {
        let parsed = UserMacroParser.parse(r#"{$PORT:"a"x}"#, 0);
        assert!(parsed.is_fail());
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("incorrect syntax near \"x}\"".to_string())
        );
    }

    #[test]
    fn test_lowercase_name_fails_at_name() {
        let parsed = UserMacroParser.parse("{$delay}", 0);
        assert_eq!(parsed.error().map(|e| e.offset()), Some(2));
    }

    #[test]
    fn test_unterminated_macro() {
        let parsed = UserMacroParser.parse("{$DELAY", 0);
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("unexpected end of string".to_string())
        );
    }

    #[test]
    fn test_lld_macro() {
        let parsed = LldMacroParser.parse("{#IFNAME}", 0);
        assert!(parsed.is_full());
        assert_eq!(parsed.value().map(|m| m.name.as_str()), Some("IFNAME"));

        assert!(LldMacroParser.parse("{$IFNAME}", 0).is_fail());
        assert!(LldMacroParser.parse("{#IFNAME:ctx}", 0).is_fail());
    }
}
