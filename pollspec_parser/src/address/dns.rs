//! DNS names

use super::{scan_operand, Operand};
use crate::config::compile_time::address::{MAX_DNS_LABEL_LENGTH, MAX_DNS_LENGTH};
use crate::lexical::{peek, scan_while};
use crate::syntax::{Parser, Scanned, SyntaxError};
use crate::macros::MacroOptions;

#[derive(Debug, Clone, Copy, Default)]
pub struct DnsParser {
    macros: MacroOptions,
}

impl DnsParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_macros(macros: MacroOptions) -> Self {
        Self { macros }
    }

    fn scan_literal(source: &str, start: usize) -> Scanned<String> {
        let mut pos = start;

        loop {
            let end = scan_while(source, pos, is_label_byte);
            if end == pos {
                return Err(SyntaxError::at(source, pos));
            }
            if end - pos > MAX_DNS_LABEL_LENGTH {
                return Err(SyntaxError::at(source, pos + MAX_DNS_LABEL_LENGTH));
            }
            if end - start > MAX_DNS_LENGTH {
                return Err(SyntaxError::at(source, start + MAX_DNS_LENGTH));
            }
            pos = end;

            // A dot belongs to the name only when another label follows
            match (peek(source, pos), peek(source, pos + 1)) {
                (Some(b'.'), Some(next)) if is_label_byte(next) => pos += 1,
                _ => break,
            }
        }

        Ok((pos, source[start..pos].to_string()))
    }
}

impl Parser for DnsParser {
    type Output = Operand<String>;

    fn scan(&self, source: &str, start: usize) -> Scanned<Operand<String>> {
        scan_operand(source, start, self.macros, || {
            Self::scan_literal(source, start)
        })
    }
}

fn is_label_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
