//! Address and range literals
//!
//! IPv4 addresses, DNS names, numeric ranges and HTTP status code ranges.
//! Each grammar accepts a whole macro in place of a literal operand when
//! its [`MacroOptions`] allow it.

pub mod dns;
pub mod ipv4;
pub mod range;

pub use dns::DnsParser;
pub use ipv4::Ipv4Parser;
pub use range::{
    NumericRange, NumericRangeParser, RangeOptions, RangesParser, StatusCodeRangeParser,
};

use crate::macros::{scan_macro_operand, MacroOptions};
use crate::syntax::Scanned;
use serde::Serialize;

/// A literal value or a macro standing in for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand<T> {
    Literal(T),
    /// Macro source text, kept verbatim for later expansion
    Macro(String),
}

impl<T> Operand<T> {
    pub fn literal(&self) -> Option<&T> {
        match self {
            Operand::Literal(value) => Some(value),
            Operand::Macro(_) => None,
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Operand::Macro(_))
    }
}

/// Try a permitted macro at `pos`, falling back to the literal grammar
pub(crate) fn scan_operand<T>(
    source: &str,
    pos: usize,
    macros: MacroOptions,
    literal: impl FnOnce() -> Scanned<T>,
) -> Scanned<Operand<T>> {
    match scan_macro_operand(source, pos, macros) {
        Some(result) => result.map(|end| (end, Operand::Macro(source[pos..end].to_string()))),
        None => literal().map(|(end, value)| (end, Operand::Literal(value))),
    }
}
