//! Flexible intervals: `DELAY/D[-D],HH:MM-HH:MM`

use super::{ClockTime, FlexibleInterval, TimePeriod, TimeWindow};
use crate::lexical::{peek, scan_digits, scan_digits_limited};
use crate::macros::{scan_macro_operand, MacroOptions};
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleIntervalParser {
    macros: MacroOptions,
}

impl FlexibleIntervalParser {
    pub fn new(macros: MacroOptions) -> Self {
        Self { macros }
    }

    /// Delay digits or a permitted macro
    fn scan_delay(&self, source: &str, pos: usize) -> SyntaxResult<usize> {
        if let Some(result) = scan_macro_operand(source, pos, self.macros) {
            return result.map_err(|err| SyntaxError::at_interval(source, err.offset()));
        }
        let end = scan_digits(source, pos);
        if end == pos {
            return Err(SyntaxError::at_interval(source, pos));
        }
        Ok(end)
    }

    fn scan_period(&self, source: &str, pos: usize) -> Scanned<TimePeriod> {
        if let Some(result) = scan_macro_operand(source, pos, self.macros) {
            return result
                .map(|end| (end, TimePeriod::Macro(source[pos..end].to_string())))
                .map_err(|err| SyntaxError::at_interval(source, err.offset()));
        }

        let (pos, day_from) = scan_week_day(source, pos)?;
        let (pos, day_till) = if peek(source, pos) == Some(b'-') {
            let (end, day) = scan_week_day(source, pos + 1)?;
            (end, Some(day))
        } else {
            (pos, None)
        };
        let pos = expect(source, pos, b',')?;

        let (pos, time_from) = scan_clock(source, pos)?;
        let pos = expect(source, pos, b'-')?;
        let (pos, time_till) = scan_clock(source, pos)?;

        Ok((
            pos,
            TimePeriod::Window(TimeWindow {
                day_from,
                day_till,
                time_from,
                time_till,
            }),
        ))
    }
}

impl Parser for FlexibleIntervalParser {
    type Output = FlexibleInterval;

    fn scan(&self, source: &str, start: usize) -> Scanned<FlexibleInterval> {
        let delay_end = self.scan_delay(source, start)?;
        let period_start = expect(source, delay_end, b'/')?;
        let (end, period) = self.scan_period(source, period_start)?;

        Ok((
            end,
            FlexibleInterval {
                delay: source[start..delay_end].to_string(),
                period,
            },
        ))
    }
}

fn expect(source: &str, pos: usize, byte: u8) -> SyntaxResult<usize> {
    if peek(source, pos) == Some(byte) {
        Ok(pos + 1)
    } else {
        Err(SyntaxError::at_interval(source, pos))
    }
}

/// Single week day digit 1-7
fn scan_week_day(source: &str, pos: usize) -> SyntaxResult<(usize, String)> {
    match peek(source, pos) {
        Some(b'1'..=b'7') => Ok((pos + 1, source[pos..pos + 1].to_string())),
        _ => Err(SyntaxError::at_interval(source, pos)),
    }
}

/// One or two digits
fn scan_clock_part(source: &str, pos: usize) -> SyntaxResult<(usize, String)> {
    let end = scan_digits_limited(source, pos, 2)
        .map_err(|excess| SyntaxError::at_interval(source, excess))?;
    if end == pos {
        return Err(SyntaxError::at_interval(source, pos));
    }
    Ok((end, source[pos..end].to_string()))
}

fn scan_clock(source: &str, pos: usize) -> SyntaxResult<(usize, ClockTime)> {
    let (pos, hours) = scan_clock_part(source, pos)?;
    let pos = expect(source, pos, b':')?;
    let (pos, minutes) = scan_clock_part(source, pos)?;
    Ok((pos, ClockTime { hours, minutes }))
}
