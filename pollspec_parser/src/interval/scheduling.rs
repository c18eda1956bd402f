//! Scheduling intervals: `[md..][wd..][h..][m..][s..]`
//!
//! Only the lexical shape is checked here. Whether `h25` names a real
//! hour is left to the validation pass.

use super::{Clause, SchedulingInterval, SubRange};
use crate::lexical::{peek, scan_digits_limited, starts_with_at};
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulingIntervalParser;

impl Parser for SchedulingIntervalParser {
    type Output = SchedulingInterval;

    fn scan(&self, source: &str, start: usize) -> Scanned<SchedulingInterval> {
        let mut interval = SchedulingInterval::default();
        let mut previous: Option<Clause> = None;
        let mut pos = start;

        while let Some(clause) = clause_at(source, pos) {
            if previous.is_some_and(|prev| clause <= prev) {
                return Err(SyntaxError::at_interval(source, pos));
            }
            pos += clause.prefix().len();

            loop {
                let (end, range) = scan_sub_range(source, pos, clause.width())?;
                interval.clause_mut(clause).push(range);
                pos = end;

                if peek(source, pos) != Some(b',') {
                    break;
                }
                pos += 1;
            }
            previous = Some(clause);
        }

        if previous.is_none() {
            return Err(SyntaxError::at_interval(source, start));
        }
        Ok((pos, interval))
    }
}

/// Clause whose prefix starts at `pos`
pub(crate) fn clause_at(source: &str, pos: usize) -> Option<Clause> {
    if starts_with_at(source, pos, "md") {
        return Some(Clause::MonthDay);
    }
    if starts_with_at(source, pos, "wd") {
        return Some(Clause::WeekDay);
    }
    match peek(source, pos)? {
        b'h' => Some(Clause::Hour),
        b'm' => Some(Clause::Minute),
        b's' => Some(Clause::Second),
        _ => None,
    }
}

fn scan_value(source: &str, pos: usize, width: usize) -> SyntaxResult<usize> {
    scan_digits_limited(source, pos, width)
        .map_err(|excess| SyntaxError::at_interval(source, excess))
}

/// `[FROM[-TILL]][/STEP]`, never empty
fn scan_sub_range(source: &str, pos: usize, width: usize) -> Scanned<SubRange> {
    let mut range = SubRange::default();
    let text = |from: usize, to: usize| Some(source[from..to].to_string());

    let mut end = scan_value(source, pos, width)?;
    if end > pos {
        range.from = text(pos, end);

        if peek(source, end) == Some(b'-') {
            let till_start = end + 1;
            end = scan_value(source, till_start, width)?;
            if end == till_start {
                return Err(SyntaxError::at_interval(source, till_start));
            }
            range.till = text(till_start, end);
        }
    }

    if peek(source, end) == Some(b'/') {
        let step_start = end + 1;
        end = scan_value(source, step_start, width)?;
        if end == step_start {
            return Err(SyntaxError::at_interval(source, step_start));
        }
        range.step = text(step_start, end);
    }

    if end == pos {
        return Err(SyntaxError::at_interval(source, pos));
    }
    Ok((end, range))
}
