//! Condition formulas: `A and (B or not C)`
//!
//! The parser walks the formula with an explicit two-state machine and
//! records every operand it meets, in order, duplicates included. No tree
//! is built; callers only substitute operands by name.

use crate::config::compile_time::syntax::MAX_FORMULA_DEPTH;
use crate::lexical::{is_whitespace, peek, scan_while, skip_whitespace, starts_with_at};
use crate::syntax::{Parser, Scanned, SyntaxError};
use serde::Serialize;

/// An operand and the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaOperand {
    pub name: String,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionFormula {
    pub operands: Vec<FormulaOperand>,
}

impl ConditionFormula {
    /// Operand names in order of first appearance
    pub fn distinct_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for operand in &self.operands {
            if !names.contains(&operand.name.as_str()) {
                names.push(&operand.name);
            }
        }
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectOperand,
    ExpectOperatorOrClose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionFormulaParser;

impl Parser for ConditionFormulaParser {
    type Output = ConditionFormula;

    fn scan(&self, source: &str, start: usize) -> Scanned<ConditionFormula> {
        let mut formula = ConditionFormula::default();
        let mut state = State::ExpectOperand;
        let mut depth = 0usize;
        let mut complete = start;
        let mut pos = start;

        loop {
            let token = skip_whitespace(source, pos);
            let spaced = token > pos;
            pos = token;

            match state {
                State::ExpectOperand => match peek(source, pos) {
                    Some(b'(') => {
                        if depth == MAX_FORMULA_DEPTH {
                            return Err(SyntaxError::nesting_too_deep(
                                source,
                                pos,
                                MAX_FORMULA_DEPTH,
                            ));
                        }
                        depth += 1;
                        pos += 1;
                    }
                    Some(b'n') if keyword_at(source, pos, "not") => pos += 3,
                    Some(b) if b.is_ascii_uppercase() => {
                        let end = scan_while(source, pos, |b| b.is_ascii_uppercase());
                        formula.operands.push(FormulaOperand {
                            name: source[pos..end].to_string(),
                            offset: pos,
                        });
                        pos = end;
                        if depth == 0 {
                            complete = pos;
                        }
                        state = State::ExpectOperatorOrClose;
                    }
                    _ => return Err(SyntaxError::at(source, pos)),
                },
                State::ExpectOperatorOrClose => {
                    let delimited = spaced || (pos > start && peek(source, pos - 1) == Some(b')'));

                    match peek(source, pos) {
                        Some(b')') if depth > 0 => {
                            depth -= 1;
                            pos += 1;
                            if depth == 0 {
                                complete = pos;
                            }
                        }
                        Some(b'a') if delimited && keyword_at(source, pos, "and") => {
                            pos += 3;
                            state = State::ExpectOperand;
                        }
                        Some(b'o') if delimited && keyword_at(source, pos, "or") => {
                            pos += 2;
                            state = State::ExpectOperand;
                        }
                        _ if depth > 0 => return Err(SyntaxError::at(source, pos)),
                        // Whitespace up to the end of input belongs to the formula
                        None => return Ok((pos, formula)),
                        Some(_) => return Ok((complete, formula)),
                    }
                }
            }
        }
    }
}

/// `word` at `pos` followed by whitespace, `(` or the end of input
fn keyword_at(source: &str, pos: usize, word: &str) -> bool {
    starts_with_at(source, pos, word)
        && match peek(source, pos + word.len()) {
            None => true,
            Some(b) => is_whitespace(b) || b == b'(',
        }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseOutcome;
    use assert_matches::assert_matches;

    fn operands(source: &str) -> Vec<(String, usize)> {
        ConditionFormulaParser
            .parse(source, 0)
            .into_value()
            .map(|f| f.operands.into_iter().map(|o| (o.name, o.offset)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_operands_in_scan_order() {
        let parsed = ConditionFormulaParser.parse("A and not(not B and C)", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::Success);
        assert_eq!(
            operands("A and not(not B and C)"),
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 14),
                ("C".to_string(), 20)
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let parsed = ConditionFormulaParser.parse("A or (B and A)", 0);
        let formula = parsed.into_value().unwrap();
        assert_eq!(formula.operands.len(), 3);
        assert_eq!(formula.operands[2].offset, 12);
        assert_eq!(formula.distinct_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_parenthesis_delimits_keywords() {
        assert!(ConditionFormulaParser.parse("A and(B)", 0).is_full());
        assert!(ConditionFormulaParser.parse("(A)or B", 0).is_full());
        assert!(ConditionFormulaParser.parse("not not B", 0).is_full());
    }

    #[test]
    fn test_glued_keyword_is_not_an_operator() {
        let parsed = ConditionFormulaParser.parse("AandB", 0);
        assert_eq!(parsed.outcome(), ParseOutcome::SuccessPartial);
        assert_eq!(parsed.matched_text(), "A");

        let strict = ConditionFormulaParser.parse("AandB", 0).require_full();
        assert_eq!(
            strict.error().map(|e| e.to_string()),
            Some("incorrect syntax near \"andB\"".to_string())
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let parsed = ConditionFormulaParser.parse("A AND B", 0);
        assert_eq!(parsed.matched_text(), "A");
    }

    #[test]
    fn test_trailing_whitespace() {
        let parsed = ConditionFormulaParser.parse("A or B  ", 0);
        assert!(parsed.is_full());

        let parsed = ConditionFormulaParser.parse("A or B  x", 0);
        assert_eq!(parsed.matched_text(), "A or B");
    }

    #[test]
    fn test_dangling_operator_fails() {
        let parsed = ConditionFormulaParser.parse("A and", 0);
        assert_eq!(
            parsed.error().map(|e| e.to_string()),
            Some("unexpected end of string".to_string())
        );
        assert_eq!(parsed.matched_length(), 0);
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(ConditionFormulaParser.parse("(A or B", 0).is_fail());
        assert_eq!(
            ConditionFormulaParser.parse("(A x)", 0).error().map(|e| e.offset()),
            Some(3)
        );

        let parsed = ConditionFormulaParser.parse("A or B)", 0);
        assert_eq!(parsed.matched_text(), "A or B");
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!(
            "{}A{}",
            "(".repeat(MAX_FORMULA_DEPTH + 1),
            ")".repeat(MAX_FORMULA_DEPTH + 1)
        );
        assert_matches!(
            ConditionFormulaParser.parse(&source, 0).error(),
            Some(SyntaxError::NestingTooDeep { offset, .. }) if *offset == MAX_FORMULA_DEPTH
        );

        let source = format!("{}A{}", "(".repeat(MAX_FORMULA_DEPTH), ")".repeat(MAX_FORMULA_DEPTH));
        assert!(ConditionFormulaParser.parse(&source, 0).is_full());
    }

    #[test]
    fn test_lowercase_operand_fails() {
        assert_eq!(
            ConditionFormulaParser.parse("a or B", 0).error().map(|e| e.offset()),
            Some(0)
        );
    }
}
