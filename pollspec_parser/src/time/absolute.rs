//! Absolute time with variable precision
//!
//! `YYYY[-MM[-DD[ hh[:mm[:ss]]]]]`. Whatever precision is written selects
//! a whole range of seconds: `2018-04` covers all of April 2018.

use super::TimeUnit;
use crate::lexical::peek;
use crate::syntax::{Parser, Scanned, SyntaxError, SyntaxResult};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A parsed absolute time and the span of seconds it denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbsoluteTime {
    /// Smallest unit written
    pub precision: TimeUnit,
    /// First second covered
    pub floor: NaiveDateTime,
    /// Last second covered
    pub ceil: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteTimeParser;

/// Separator and precision of each optional component after the year
const COMPONENTS: [(u8, TimeUnit); 5] = [
    (b'-', TimeUnit::Month),
    (b'-', TimeUnit::Day),
    (b' ', TimeUnit::Hour),
    (b':', TimeUnit::Minute),
    (b':', TimeUnit::Second),
];

impl Parser for AbsoluteTimeParser {
    type Output = AbsoluteTime;

    fn scan(&self, source: &str, start: usize) -> Scanned<AbsoluteTime> {
        let year = fixed_digits(source, start, 4)?;
        let mut pos = start + 4;

        let mut values = [1u32, 1, 0, 0, 0];
        let mut offsets = [start; 5];
        let mut written = 0;

        for (index, (separator, _)) in COMPONENTS.iter().enumerate() {
            if peek(source, pos) != Some(*separator) {
                break;
            }
            // An incomplete group is left over for the caller
            let Ok(value) = fixed_digits(source, pos + 1, 2) else {
                break;
            };
            values[index] = value;
            offsets[index] = pos + 1;
            written = index + 1;
            pos += 3;
        }

        let [month, day, hour, minute, second] = values;
        let year = year as i32;

        if !(1..=12).contains(&month) {
            return Err(SyntaxError::at(source, offsets[0]));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| SyntaxError::at(source, offsets[1]))?;
        if hour > 23 {
            return Err(SyntaxError::at(source, offsets[2]));
        }
        if minute > 59 {
            return Err(SyntaxError::at(source, offsets[3]));
        }
        if second > 59 {
            return Err(SyntaxError::at(source, offsets[4]));
        }

        let precision = match written {
            0 => TimeUnit::Year,
            n => COMPONENTS[n - 1].1,
        };
        let invalid = || SyntaxError::at(source, start);
        let floor = date
            .and_hms_opt(hour, minute, second)
            .ok_or_else(invalid)?;
        let ceil = ceiling(date, hour, minute, second, precision).ok_or_else(invalid)?;

        Ok((
            pos,
            AbsoluteTime {
                precision,
                floor,
                ceil,
            },
        ))
    }
}

/// Last second of the range opened by `date hour:minute:second` at `precision`
fn ceiling(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
    precision: TimeUnit,
) -> Option<NaiveDateTime> {
    let end_of_day = |date: NaiveDate| date.and_hms_opt(23, 59, 59);

    match precision {
        TimeUnit::Year => end_of_day(NaiveDate::from_ymd_opt(date.year(), 12, 31)?),
        TimeUnit::Month => end_of_day(date.checked_add_months(Months::new(1))?.pred_opt()?),
        TimeUnit::Day | TimeUnit::Week => end_of_day(date),
        TimeUnit::Hour => date.and_hms_opt(hour, 59, 59),
        TimeUnit::Minute => date.and_hms_opt(hour, minute, 59),
        TimeUnit::Second => date.and_hms_opt(hour, minute, second),
    }
}

/// Exactly `width` digits at `pos`
fn fixed_digits(source: &str, pos: usize, width: usize) -> SyntaxResult<u32> {
    let mut value = 0u32;
    for offset in pos..pos + width {
        match peek(source, offset) {
            Some(b) if b.is_ascii_digit() => value = value * 10 + u32::from(b - b'0'),
            _ => return Err(SyntaxError::at(source, offset)),
        }
    }
    Ok(value)
}
