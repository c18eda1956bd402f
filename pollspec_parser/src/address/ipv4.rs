//! Dotted-quad IPv4 literals

use super::{scan_operand, Operand};
use crate::lexical::{peek, scan_digits_limited};
use crate::macros::MacroOptions;
use crate::syntax::{Parser, Scanned, SyntaxError};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4Parser {
    macros: MacroOptions,
}

impl Ipv4Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_macros(macros: MacroOptions) -> Self {
        Self { macros }
    }

    fn scan_literal(source: &str, start: usize) -> Scanned<Ipv4Addr> {
        let mut octets = [0u8; 4];
        let mut pos = start;

        for (index, octet) in octets.iter_mut().enumerate() {
            if index > 0 {
                if peek(source, pos) != Some(b'.') {
                    return Err(SyntaxError::at(source, pos));
                }
                pos += 1;
            }

            let end = scan_digits_limited(source, pos, 3)
                .map_err(|excess| SyntaxError::at(source, excess))?;
            if end == pos {
                return Err(SyntaxError::at(source, pos));
            }
            *octet = source[pos..end]
                .parse::<u8>()
                .map_err(|_| SyntaxError::at(source, pos))?;
            pos = end;
        }

        Ok((pos, Ipv4Addr::from(octets)))
    }
}

impl Parser for Ipv4Parser {
    type Output = Operand<Ipv4Addr>;

    fn scan(&self, source: &str, start: usize) -> Scanned<Operand<Ipv4Addr>> {
        scan_operand(source, start, self.macros, || {
            Self::scan_literal(source, start)
        })
    }
}
