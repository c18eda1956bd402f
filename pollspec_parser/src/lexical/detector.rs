//! Macro family detection by opening delimiter

use super::scanner::starts_with_at;

/// Macro families recognised by lookahead alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// `{$NAME}` or `{$NAME:context}`
    User,
    /// `{#NAME}`
    Lld,
    /// `{{#NAME}.func(params)}`
    LldFunction,
}

/// Identify the macro family starting at `pos` without validating it
pub fn detect_macro(source: &str, pos: usize) -> Option<MacroKind> {
    if starts_with_at(source, pos, "{{#") {
        Some(MacroKind::LldFunction)
    } else if starts_with_at(source, pos, "{$") {
        Some(MacroKind::User)
    } else if starts_with_at(source, pos, "{#") {
        Some(MacroKind::Lld)
    } else {
        None
    }
}
