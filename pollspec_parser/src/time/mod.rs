//! Time grammars: absolute, relative, range time and simple intervals

pub mod absolute;
pub mod range;
pub mod relative;
pub mod simple;
pub mod unit;

pub use absolute::{AbsoluteTime, AbsoluteTimeParser};
pub use range::{RangeTime, RangeTimeParser};
pub use relative::{RelativeTime, RelativeTimeParser, Sign, TimeToken};
pub use simple::{SimpleInterval, SimpleIntervalOptions, SimpleIntervalParser};
pub use unit::TimeUnit;
