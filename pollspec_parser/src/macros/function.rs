//! Function macros
//!
//! `{host:item.key[params].function(params)}` and the discovery variant
//! `{{#MACRO}.function(params)}`. Both expose their parts decomposed so a
//! caller can substitute into each piece independently.

use super::user::LldMacroParser;
use crate::config::compile_time::macros::MAX_FUNCTION_PARAMS;
use crate::lexical::{peek, scan_while, skip_whitespace};
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};
use serde::Serialize;

/// One function parameter as written and as the caller should read it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionParam {
    /// Source text of the parameter, quotes included
    pub raw: String,
    /// Parameter text with quoting removed
    pub value: String,
    pub quoted: bool,
    /// Byte offset of the parameter in the source
    pub offset: usize,
}

/// `{host:key.function(params)}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionMacro {
    pub host: String,
    pub item_key: String,
    pub function: String,
    pub params: Vec<FunctionParam>,
}

/// `{{#MACRO}.function(params)}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LldFunctionMacro {
    pub macro_name: String,
    pub function: String,
    pub params: Vec<FunctionParam>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionMacroParser;

impl Parser for FunctionMacroParser {
    type Output = FunctionMacro;

    fn scan(&self, source: &str, start: usize) -> Scanned<FunctionMacro> {
        if peek(source, start) != Some(b'{') {
            return Err(SyntaxError::at(source, start));
        }

        let host_start = start + 1;
        let host_end = scan_while(source, host_start, is_host_byte);
        if host_end == host_start {
            return Err(SyntaxError::at(source, host_start));
        }
        if peek(source, host_end) != Some(b':') {
            return Err(SyntaxError::at(source, host_end));
        }

        let key_start = host_end + 1;
        let run_end = scan_while(source, key_start, is_key_byte);

        let (key_end, function_start) = if peek(source, run_end) == Some(b'[') {
            if run_end == key_start {
                return Err(SyntaxError::at(source, key_start));
            }
            let params_end = scan_key_params(source, run_end)?;
            if peek(source, params_end) != Some(b'.') {
                return Err(SyntaxError::at(source, params_end));
            }
            (params_end, params_end + 1)
        } else {
            // Without key parameters the function name follows the last dot
            match source[key_start..run_end].rfind('.') {
                Some(dot) if dot > 0 => (key_start + dot, key_start + dot + 1),
                _ => return Err(SyntaxError::at(source, run_end)),
            }
        };

        let (open, function) = scan_function_name(source, function_start)?;
        let (close, params) = scan_params(source, open)?;
        if peek(source, close) != Some(b'}') {
            return Err(SyntaxError::at(source, close));
        }

        Ok((
            close + 1,
            FunctionMacro {
                host: source[host_start..host_end].to_string(),
                item_key: source[key_start..key_end].to_string(),
                function,
                params,
            },
        ))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LldFunctionMacroParser;

impl Parser for LldFunctionMacroParser {
    type Output = LldFunctionMacro;

    fn scan(&self, source: &str, start: usize) -> Scanned<LldFunctionMacro> {
        if peek(source, start) != Some(b'{') {
            return Err(SyntaxError::at(source, start));
        }

        let (macro_end, inner) = LldMacroParser.scan(source, start + 1)?;
        if peek(source, macro_end) != Some(b'.') {
            return Err(SyntaxError::at(source, macro_end));
        }

        let (open, function) = scan_function_name(source, macro_end + 1)?;
        let (close, params) = scan_params(source, open)?;
        if peek(source, close) != Some(b'}') {
            return Err(SyntaxError::at(source, close));
        }

        Ok((
            close + 1,
            LldFunctionMacro {
                macro_name: inner.name,
                function,
                params,
            },
        ))
    }
}

fn is_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b' ' | b'-')
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-')
}

/// Function name at `pos`; returns the offset of `(` and the name
fn scan_function_name(source: &str, pos: usize) -> SyntaxResult<(usize, String)> {
    let end = scan_while(source, pos, |b| b.is_ascii_alphanumeric() || b == b'_');
    if end == pos {
        return Err(SyntaxError::at(source, pos));
    }
    if peek(source, end) != Some(b'(') {
        return Err(SyntaxError::at(source, end));
    }
    Ok((end, source[pos..end].to_string()))
}

/// Bracketed item key parameters at `pos` (on `[`); returns the offset after `]`
fn scan_key_params(source: &str, pos: usize) -> SyntaxResult<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = pos;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            b'"' => {
                let (end, _) = scan_param_quoted(source, i)?;
                i = end;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    Err(SyntaxError::at(source, source.len()))
}

/// Function parameter list; `open` points at `(`
///
/// Returns the offset after `)` and the parameters split on top-level commas.
fn scan_params(source: &str, open: usize) -> SyntaxResult<(usize, Vec<FunctionParam>)> {
    let mut params = Vec::new();
    let mut pos = open + 1;

    if peek(source, skip_whitespace(source, pos)) == Some(b')') {
        return Ok((skip_whitespace(source, pos) + 1, params));
    }

    loop {
        let param_start = skip_whitespace(source, pos);
        if params.len() == MAX_FUNCTION_PARAMS {
            return Err(SyntaxError::at(source, param_start));
        }

        if peek(source, param_start) == Some(b'"') {
            let (end, value) = scan_param_quoted(source, param_start)?;
            params.push(FunctionParam {
                raw: source[param_start..end].to_string(),
                value,
                quoted: true,
                offset: param_start,
            });
            pos = skip_whitespace(source, end);
        } else {
            let end = scan_while(source, param_start, |b| b != b',' && b != b')');
            let raw = &source[param_start..end];
            params.push(FunctionParam {
                raw: raw.to_string(),
                value: raw.to_string(),
                quoted: false,
                offset: param_start,
            });
            pos = end;
        }

        match peek(source, pos) {
            Some(b',') => pos += 1,
            Some(b')') => return Ok((pos + 1, params)),
            _ => return Err(SyntaxError::at(source, pos)),
        }
    }
}

/// Quoted function parameter; only `\"` is an escape, other backslashes are literal
fn scan_param_quoted(source: &str, pos: usize) -> SyntaxResult<(usize, String)> {
    let rest = source.get(pos + 1..).unwrap_or("");
    let mut value = String::new();
    let mut chars = rest.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => return Ok((pos + 1 + index + 1, value)),
            '\\' if matches!(chars.peek(), Some((_, '"'))) => {
                value.push('"');
                chars.next();
            }
            _ => value.push(ch),
        }
    }

    Err(SyntaxError::at(source, source.len()))
}
