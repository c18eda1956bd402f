//! Validation rule strings: `required|fatal|in a,b,c|db hosts.name`
//!
//! A flat directive list configuring a field validator. Every directive
//! may appear once, and at most one of them may set the field type.

use crate::lexical::{peek, scan_while, skip_whitespace, starts_with_at};
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    Fatal,
    Required,
    NotEmpty,
    Json,
    Id,
    ArrayId,
    In { values: Vec<String> },
    Db { table: String, field: String },
    ArrayDb { table: String, field: String },
}

impl Directive {
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Fatal => "fatal",
            Directive::Required => "required",
            Directive::NotEmpty => "not_empty",
            Directive::Json => "json",
            Directive::Id => "id",
            Directive::ArrayId => "array_id",
            Directive::In { .. } => "in",
            Directive::Db { .. } => "db",
            Directive::ArrayDb { .. } => "array_db",
        }
    }

    /// Whether the directive sets the field type
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Directive::Json
                | Directive::Id
                | Directive::ArrayId
                | Directive::Db { .. }
                | Directive::ArrayDb { .. }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationRules {
    pub directives: Vec<Directive>,
}

impl ValidationRules {
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name() == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_type(&self) -> Option<&Directive> {
        self.directives.iter().find(|d| d.is_type())
    }
}

/// Directive names, longest first so that a prefix never shadows a longer name
const VOCABULARY: [&str; 9] = [
    "not_empty", "array_db", "array_id", "required", "fatal", "json", "db", "id", "in",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationRuleParser;

impl Parser for ValidationRuleParser {
    type Output = ValidationRules;

    fn scan(&self, source: &str, start: usize) -> Scanned<ValidationRules> {
        let mut rules = ValidationRules::default();
        let mut pos = skip_whitespace(source, start);

        loop {
            let directive_start = pos;
            let (end, directive) = scan_directive(source, pos)?;

            if rules.has(directive.name()) {
                return Err(SyntaxError::at(source, directive_start));
            }
            if directive.is_type() && rules.field_type().is_some() {
                return Err(SyntaxError::at(source, directive_start));
            }
            rules.directives.push(directive);

            pos = skip_whitespace(source, end);
            match peek(source, pos) {
                Some(b'|') => pos = skip_whitespace(source, pos + 1),
                None => return Ok((pos, rules)),
                Some(_) => return Err(SyntaxError::at(source, pos)),
            }
        }
    }
}

fn scan_directive(source: &str, pos: usize) -> Scanned<Directive> {
    let name = VOCABULARY
        .iter()
        .find(|name| starts_with_at(source, pos, name))
        .ok_or_else(|| SyntaxError::at(source, pos))?;
    let end = pos + name.len();

    let directive = match *name {
        "fatal" => Directive::Fatal,
        "required" => Directive::Required,
        "not_empty" => Directive::NotEmpty,
        "json" => Directive::Json,
        "id" => Directive::Id,
        "array_id" => Directive::ArrayId,
        "in" => {
            let (end, values) = scan_values(source, argument_start(source, end)?)?;
            return Ok((end, Directive::In { values }));
        }
        _ => {
            let (end, table, field) = scan_table_field(source, argument_start(source, end)?)?;
            let directive = if *name == "db" {
                Directive::Db { table, field }
            } else {
                Directive::ArrayDb { table, field }
            };
            return Ok((end, directive));
        }
    };

    Ok((end, directive))
}

/// Arguments are separated from the directive name by whitespace
fn argument_start(source: &str, pos: usize) -> SyntaxResult<usize> {
    let start = skip_whitespace(source, pos);
    if start == pos || start == source.len() {
        return Err(SyntaxError::at(source, start));
    }
    Ok(start)
}

/// `a,b,c`; each value is trimmed and must not be empty
fn scan_values(source: &str, pos: usize) -> SyntaxResult<(usize, Vec<String>)> {
    let mut values = Vec::new();
    let mut value_start = pos;

    loop {
        let end = scan_while(source, value_start, |b| b != b',' && b != b'|');
        let value = source[value_start..end].trim();
        if value.is_empty() {
            return Err(SyntaxError::at(source, skip_whitespace(source, value_start)));
        }
        values.push(value.to_string());

        if peek(source, end) != Some(b',') {
            return Ok((end, values));
        }
        value_start = end + 1;
    }
}

/// `table.field`
fn scan_table_field(source: &str, pos: usize) -> SyntaxResult<(usize, String, String)> {
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

    let table_end = scan_while(source, pos, is_ident);
    if table_end == pos {
        return Err(SyntaxError::at(source, pos));
    }
    if peek(source, table_end) != Some(b'.') {
        return Err(SyntaxError::at(source, table_end));
    }
    let field_start = table_end + 1;
    let field_end = scan_while(source, field_start, is_ident);
    if field_end == field_start {
        return Err(SyntaxError::at(source, field_start));
    }

    Ok((
        field_end,
        source[pos..table_end].to_string(),
        source[field_start..field_end].to_string(),
    ))
}
