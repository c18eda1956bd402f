//! Time unit suffixes shared by the time grammars

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// Unit for a suffix byte; `M` is month and `m` is minute
    pub fn from_suffix(b: u8) -> Option<Self> {
        match b {
            b'y' => Some(Self::Year),
            b'M' => Some(Self::Month),
            b'w' => Some(Self::Week),
            b'd' => Some(Self::Day),
            b'h' => Some(Self::Hour),
            b'm' => Some(Self::Minute),
            b's' => Some(Self::Second),
            _ => None,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            Self::Year => 'y',
            Self::Month => 'M',
            Self::Week => 'w',
            Self::Day => 'd',
            Self::Hour => 'h',
            Self::Minute => 'm',
            Self::Second => 's',
        }
    }

    /// Length in seconds, counting a month as 30 days and a year as 365
    pub fn seconds(self) -> u64 {
        match self {
            Self::Year => 365 * 86_400,
            Self::Month => 30 * 86_400,
            Self::Week => 7 * 86_400,
            Self::Day => 86_400,
            Self::Hour => 3_600,
            Self::Minute => 60,
            Self::Second => 1,
        }
    }

    /// Whether the unit has a calendar-dependent length
    pub fn is_calendar(self) -> bool {
        matches!(self, Self::Year | Self::Month)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}
