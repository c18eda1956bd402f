//! Macro parsers
//!
//! Covers user macros (`{$NAME:context}`), low-level discovery macros
//! (`{#NAME}`, `{{#NAME}.func()}`), built-in macros with a reference
//! suffix (`{HOST.HOST2}`, `{EVENT.TAGS."name"}`), function macros
//! (`{host:key.func(params)}`) and regex replacement tokens (`\1`).

pub mod builtin;
pub mod function;
pub mod replacement;
pub mod user;

pub use builtin::{MacroParser, ReferenceMode};
pub use function::{
    FunctionMacro, FunctionMacroParser, FunctionParam, LldFunctionMacro, LldFunctionMacroParser,
};
pub use replacement::{Replacement, ReplacementParser};
pub use user::{LldMacroParser, UserMacroParser};

use crate::lexical::{detect_macro, MacroKind};
use crate::syntax::{Parser, SyntaxResult};
use serde::{Deserialize, Serialize};

/// Reference suffix of a built-in macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MacroReference {
    /// `{HOST.HOST2}` refers to the second host
    Numeric(u8),
    /// `{EVENT.TAGS."Service name"}` names a tag
    String(String),
}

/// User macro context after unescaping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroContext {
    pub value: String,
    pub quoted: bool,
}

/// A parsed macro reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroMatch {
    pub name: String,
    pub reference: Option<MacroReference>,
    pub context: Option<MacroContext>,
}

impl MacroMatch {
    pub(crate) fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reference: None,
            context: None,
        }
    }
}

/// Which macro families may stand in for a literal operand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroOptions {
    pub allow_user_macros: bool,
    pub allow_lld_macros: bool,
}

impl MacroOptions {
    /// Literals only
    pub fn none() -> Self {
        Self::default()
    }

    /// User macros only
    pub fn user() -> Self {
        Self {
            allow_user_macros: true,
            allow_lld_macros: false,
        }
    }

    /// User and low-level discovery macros
    pub fn all() -> Self {
        Self {
            allow_user_macros: true,
            allow_lld_macros: true,
        }
    }

    pub fn allows(&self, kind: MacroKind) -> bool {
        match kind {
            MacroKind::User => self.allow_user_macros,
            MacroKind::Lld | MacroKind::LldFunction => self.allow_lld_macros,
        }
    }
}

/// Scan a macro standing in for an operand at `pos`
///
/// `None` means no permitted macro starts here and the caller should try
/// its literal grammar. `Some(Err)` means a permitted macro started but is
/// malformed, which the caller reports as-is.
pub(crate) fn scan_macro_operand(
    source: &str,
    pos: usize,
    options: MacroOptions,
) -> Option<SyntaxResult<usize>> {
    let kind = detect_macro(source, pos).filter(|kind| options.allows(*kind))?;

    let end = match kind {
        MacroKind::User => UserMacroParser.scan(source, pos).map(|(end, _)| end),
        MacroKind::Lld => LldMacroParser.scan(source, pos).map(|(end, _)| end),
        MacroKind::LldFunction => LldFunctionMacroParser.scan(source, pos).map(|(end, _)| end),
    };

    Some(end)
}

/// Characters allowed in user and discovery macro names
pub(crate) fn is_macro_name_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_scan_respects_options() {
        let source = "{$DELAY}s";
        assert_eq!(scan_macro_operand(source, 0, MacroOptions::none()), None);
        assert_eq!(
            scan_macro_operand(source, 0, MacroOptions::user()),
            Some(Ok(8))
        );

        let lld = "{#PORT}";
        assert_eq!(scan_macro_operand(lld, 0, MacroOptions::user()), None);
        assert_eq!(scan_macro_operand(lld, 0, MacroOptions::all()), Some(Ok(7)));
    }

    #[test]
    fn test_malformed_permitted_macro_is_reported() {
        let result = scan_macro_operand("{$lower}", 0, MacroOptions::user());
        assert_eq!(result.map(|r| r.map_err(|e| e.offset())), Some(Err(2)));
    }

    #[test]
    fn test_lld_function_operand() {
        let source = "{{#NAME}.regsub(\"^(\\d+)\", \\1)},rest";
        assert_eq!(
            scan_macro_operand(source, 0, MacroOptions::all()),
            Some(Ok(30))
        );
    }
}
