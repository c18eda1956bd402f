//! Checks for update, flexible and scheduling intervals

use super::{validate_simple_interval, ValidationIssue};
use crate::config::compile_time::interval::MAX_DELAY_SECONDS;
use crate::interval::{
    Clause, ClockTime, FlexibleInterval, Interval, SchedulingInterval, SubRange, TimePeriod,
    TimeWindow, UpdateInterval,
};
use crate::logging::codes;

/// Validate an update interval and all of its custom intervals
pub fn validate_update_interval(value: &UpdateInterval) -> Vec<ValidationIssue> {
    let mut issues = validate_simple_interval(&value.delay, "delay");

    if let Some(delay) = value.delay.to_seconds() {
        if delay > MAX_DELAY_SECONDS as i64 {
            issues.push(ValidationIssue::error(
                codes::semantic::DELAY_TOO_LARGE,
                "delay",
                format!(
                    "delay \"{}\" exceeds maximum delay \"{}\"",
                    value.delay, MAX_DELAY_SECONDS
                ),
            ));
        }

        // Flexible delays with macros may turn out non-zero
        let active = value.has_scheduling()
            || value.flexible().any(|f| f.delay_seconds() != Some(0));
        if delay == 0 && !active {
            issues.push(ValidationIssue::error(
                codes::semantic::MISSING_ACTIVE_INTERVAL,
                "delay",
                "zero delay requires a flexible interval with a non-zero delay or a scheduling interval",
            ));
        }
    }

    for (index, interval) in value.intervals.iter().enumerate() {
        let path = format!("intervals/{}", index + 1);
        match interval {
            Interval::Flexible(flexible) => issues.extend(validate_flexible(flexible, &path)),
            Interval::Scheduling(scheduling) => {
                issues.extend(validate_scheduling(scheduling, &path))
            }
        }
    }

    issues
}

/// Validate one flexible interval found at `path`
pub fn validate_flexible(interval: &FlexibleInterval, path: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match interval.delay_seconds() {
        Some(delay) if delay > MAX_DELAY_SECONDS => issues.push(ValidationIssue::error(
            codes::semantic::DELAY_TOO_LARGE,
            format!("{}/delay", path),
            format!(
                "invalid flexible interval delay \"{}\": delay exceeds maximum delay \"{}\"",
                interval.delay, MAX_DELAY_SECONDS
            ),
        )),
        Some(_) => {}
        None => issues.push(macro_warning(format!("{}/delay", path), &interval.delay)),
    }

    let window = match &interval.period {
        TimePeriod::Window(window) => window,
        TimePeriod::Macro(text) => {
            issues.push(macro_warning(format!("{}/period", path), text));
            return issues;
        }
    };
    issues.extend(validate_window(window, &format!("{}/period", path)));

    // Only compare against the window once delay and window are sound
    if issues.is_empty() {
        let span = window_seconds(window);
        if let (Some(delay), Some(span)) = (interval.delay_seconds(), span) {
            if delay > span {
                issues.push(ValidationIssue::warning(
                    codes::semantic::DELAY_EXCEEDS_PERIOD,
                    path,
                    format!(
                        "delay \"{}\" is longer than time period \"{}\"",
                        interval.delay, window
                    ),
                ));
            }
        }
    }

    issues
}

fn validate_window(window: &TimeWindow, path: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let day_from: Option<u32> = window.day_from.parse().ok();
    let day_till: Option<u32> = match &window.day_till {
        Some(till) => till.parse().ok(),
        None => day_from,
    };
    for day in [day_from, day_till].into_iter().flatten() {
        if !(1..=7).contains(&day) {
            issues.push(ValidationIssue::error(
                codes::semantic::VALUE_OUT_OF_RANGE,
                path,
                format!("invalid week day \"{}\"", day),
            ));
        }
    }
    if let (Some(from), Some(till)) = (day_from, day_till) {
        if from > till {
            issues.push(ValidationIssue::error(
                codes::semantic::INVERTED_RANGE,
                path,
                format!(
                    "incorrect time period \"{}\": start day must be less or equal to end day",
                    window
                ),
            ));
        }
    }

    let mut clock_valid = true;
    for time in [&window.time_from, &window.time_till] {
        if clock_minutes(time).is_none() {
            clock_valid = false;
            issues.push(ValidationIssue::error(
                codes::semantic::VALUE_OUT_OF_RANGE,
                path,
                format!("invalid time \"{}\"", time),
            ));
        }
    }
    if clock_valid && window_seconds(window).is_none() {
        issues.push(ValidationIssue::error(
            codes::semantic::INVERTED_RANGE,
            path,
            format!(
                "incorrect time period \"{}\": start time must be less than end time",
                window
            ),
        ));
    }

    issues
}

/// Minutes since midnight, allowing exactly `24:00` as the end of day
fn clock_minutes(time: &ClockTime) -> Option<u32> {
    let minutes = time.minutes_of_day()?;
    let hours: u32 = time.hours.parse().ok()?;
    let within_hour: u32 = time.minutes.parse().ok()?;
    (within_hour < 60 && hours <= 24 && minutes <= 24 * 60).then_some(minutes)
}

/// Length of the daily window in seconds; `None` when empty or inverted
fn window_seconds(window: &TimeWindow) -> Option<u64> {
    let from = clock_minutes(&window.time_from)?;
    let till = clock_minutes(&window.time_till)?;
    (from < till).then(|| u64::from(till - from) * 60)
}

/// Validate one scheduling interval found at `path`
pub fn validate_scheduling(interval: &SchedulingInterval, path: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for clause in Clause::ALL {
        for (index, range) in interval.clause(clause).iter().enumerate() {
            let range_path = format!("{}/{}/{}", path, clause.prefix(), index + 1);
            issues.extend(validate_sub_range(clause, range, &range_path));
        }
    }

    issues
}

fn clause_noun(clause: Clause) -> &'static str {
    match clause {
        Clause::MonthDay => "month day",
        Clause::WeekDay => "week day",
        Clause::Hour => "hours",
        Clause::Minute => "minutes",
        Clause::Second => "seconds",
    }
}

fn validate_sub_range(clause: Clause, range: &SubRange, path: &str) -> Vec<ValidationIssue> {
    let (min, max) = clause.limits();
    let noun = clause_noun(clause);
    let mut issues = Vec::new();

    let parse = |text: &Option<String>| text.as_deref().and_then(|t| t.parse::<u32>().ok());
    let from = parse(&range.from);
    let till = parse(&range.till);
    let step = parse(&range.step);

    let mut bounds_valid = true;
    for (text, value) in [(&range.from, from), (&range.till, till)] {
        if let (Some(text), Some(value)) = (text, value) {
            if !(min..=max).contains(&value) {
                bounds_valid = false;
                issues.push(ValidationIssue::error(
                    codes::semantic::VALUE_OUT_OF_RANGE,
                    path,
                    format!("invalid {} \"{}\"", noun, text),
                ));
            }
        }
    }
    if !bounds_valid {
        return issues;
    }

    if let (Some(from), Some(till)) = (from, till) {
        if from > till {
            issues.push(ValidationIssue::error(
                codes::semantic::INVERTED_RANGE,
                path,
                format!(
                    "invalid interval \"{}{}\": starting {} must be less than ending {}",
                    clause.prefix(),
                    range,
                    noun,
                    noun
                ),
            ));
            return issues;
        }
    }

    if let (Some(text), Some(step)) = (&range.step, step) {
        // A step spans from the start of the range to its end, or to the clause limit
        let lower = from.unwrap_or(min);
        let upper = till.unwrap_or(max);
        if step == 0 || step > upper.saturating_sub(lower) {
            issues.push(ValidationIssue::error(
                codes::semantic::VALUE_OUT_OF_RANGE,
                path,
                format!("invalid {} step \"{}\"", noun, text),
            ));
        }
    }

    issues
}

fn macro_warning(path: String, text: &str) -> ValidationIssue {
    ValidationIssue::warning(
        codes::semantic::UNRESOLVED_MACRO,
        path,
        format!("\"{}\" is checked only after macro expansion", text),
    )
}
