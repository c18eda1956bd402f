//! Item polling intervals
//!
//! An update interval is a simple interval optionally followed by
//! `;`-separated custom intervals. Each custom interval is either a
//! flexible window (`50/1-5,09:00-18:00`) overriding the delay, or a
//! cron-like scheduling interval (`wd1-5h9m30`).
//!
//! All numeric pieces keep their source text so that an interval renders
//! back to exactly what the operator typed.

pub mod custom;
pub mod flexible;
pub mod scheduling;

pub use custom::{CustomIntervalsParser, UpdateInterval, UpdateIntervalParser};
pub use flexible::FlexibleIntervalParser;
pub use scheduling::SchedulingIntervalParser;

use serde::Serialize;
use std::fmt;

/// A custom interval entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interval {
    Flexible(FlexibleInterval),
    Scheduling(SchedulingInterval),
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Flexible(interval) => interval.fmt(f),
            Interval::Scheduling(interval) => interval.fmt(f),
        }
    }
}

// ============================================================================
// Flexible intervals
// ============================================================================

/// `DELAY/PERIOD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlexibleInterval {
    /// Delay digits or a macro, as written
    pub delay: String,
    pub period: TimePeriod,
}

impl FlexibleInterval {
    /// Delay in seconds; `None` when the delay is a macro
    pub fn delay_seconds(&self) -> Option<u64> {
        self.delay.parse().ok()
    }
}

impl fmt::Display for FlexibleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.delay, self.period)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TimePeriod {
    Window(TimeWindow),
    Macro(String),
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePeriod::Window(window) => window.fmt(f),
            TimePeriod::Macro(text) => write!(f, "{}", text),
        }
    }
}

/// `D[-D],HH:MM-HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub day_from: String,
    pub day_till: Option<String>,
    pub time_from: ClockTime,
    pub time_till: ClockTime,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.day_from)?;
        if let Some(till) = &self.day_till {
            write!(f, "-{}", till)?;
        }
        write!(f, ",{}-{}", self.time_from, self.time_till)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockTime {
    pub hours: String,
    pub minutes: String,
}

impl ClockTime {
    /// Minutes since midnight
    pub fn minutes_of_day(&self) -> Option<u32> {
        let hours: u32 = self.hours.parse().ok()?;
        let minutes: u32 = self.minutes.parse().ok()?;
        Some(hours * 60 + minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hours, self.minutes)
    }
}

// ============================================================================
// Scheduling intervals
// ============================================================================

/// Scheduling clause, in the order clauses must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    MonthDay,
    WeekDay,
    Hour,
    Minute,
    Second,
}

impl Clause {
    pub const ALL: [Clause; 5] = [
        Clause::MonthDay,
        Clause::WeekDay,
        Clause::Hour,
        Clause::Minute,
        Clause::Second,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Clause::MonthDay => "md",
            Clause::WeekDay => "wd",
            Clause::Hour => "h",
            Clause::Minute => "m",
            Clause::Second => "s",
        }
    }

    /// Maximum digits of a single value in this clause
    pub fn width(self) -> usize {
        match self {
            Clause::WeekDay => 1,
            _ => 2,
        }
    }

    /// Inclusive range of values the clause accepts
    pub fn limits(self) -> (u32, u32) {
        match self {
            Clause::MonthDay => (1, 31),
            Clause::WeekDay => (1, 7),
            Clause::Hour => (0, 23),
            Clause::Minute | Clause::Second => (0, 59),
        }
    }
}

/// `[FROM[-TILL]][/STEP]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubRange {
    pub from: Option<String>,
    pub till: Option<String>,
    pub step: Option<String>,
}

impl fmt::Display for SubRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(from) = &self.from {
            write!(f, "{}", from)?;
        }
        if let Some(till) = &self.till {
            write!(f, "-{}", till)?;
        }
        if let Some(step) = &self.step {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulingInterval {
    pub month_day: Vec<SubRange>,
    pub week_day: Vec<SubRange>,
    pub hour: Vec<SubRange>,
    pub minute: Vec<SubRange>,
    pub second: Vec<SubRange>,
}

impl SchedulingInterval {
    pub fn clause(&self, clause: Clause) -> &[SubRange] {
        match clause {
            Clause::MonthDay => &self.month_day,
            Clause::WeekDay => &self.week_day,
            Clause::Hour => &self.hour,
            Clause::Minute => &self.minute,
            Clause::Second => &self.second,
        }
    }

    pub(crate) fn clause_mut(&mut self, clause: Clause) -> &mut Vec<SubRange> {
        match clause {
            Clause::MonthDay => &mut self.month_day,
            Clause::WeekDay => &mut self.week_day,
            Clause::Hour => &mut self.hour,
            Clause::Minute => &mut self.minute,
            Clause::Second => &mut self.second,
        }
    }
}

impl fmt::Display for SchedulingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in Clause::ALL {
            let ranges = self.clause(clause);
            if ranges.is_empty() {
                continue;
            }
            write!(f, "{}", clause.prefix())?;
            for (index, range) in ranges.iter().enumerate() {
                if index > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", range)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(from: &str, till: Option<&str>, step: Option<&str>) -> SubRange {
        SubRange {
            from: Some(from.to_string()),
            till: till.map(str::to_string),
            step: step.map(str::to_string),
        }
    }

    #[test]
    fn test_scheduling_display_keeps_clause_order() {
        let interval = SchedulingInterval {
            week_day: vec![sub("1", Some("5"), None)],
            hour: vec![sub("9", None, None), sub("18", None, None)],
            second: vec![SubRange {
                step: Some("10".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(interval.to_string(), "wd1-5h9,18s/10");
    }

    #[test]
    fn test_flexible_display_and_delay() {
        let interval = FlexibleInterval {
            delay: "50".to_string(),
            period: TimePeriod::Window(TimeWindow {
                day_from: "1".to_string(),
                day_till: Some("7".to_string()),
                time_from: ClockTime {
                    hours: "9".to_string(),
                    minutes: "05".to_string(),
                },
                time_till: ClockTime {
                    hours: "18".to_string(),
                    minutes: "00".to_string(),
                },
            }),
        };
        assert_eq!(interval.to_string(), "50/1-7,9:05-18:00");
        assert_eq!(interval.delay_seconds(), Some(50));
    }

    #[test]
    fn test_clause_order_and_limits() {
        assert!(Clause::MonthDay < Clause::Second);
        assert_eq!(Clause::WeekDay.width(), 1);
        assert_eq!(Clause::Hour.limits(), (0, 23));
    }
}
