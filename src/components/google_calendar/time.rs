use crate::error::{validation_error, ServiceResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Inclusive UTC time window for an events list query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

impl TimeWindow {
    /// Window start as an RFC 3339 timestamp with millisecond precision
    pub fn time_min_rfc3339(&self) -> String {
        self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Window end as an RFC 3339 timestamp with millisecond precision
    pub fn time_max_rfc3339(&self) -> String {
        self.time_max.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Parse a date string in strict YYYY-MM-DD format
///
/// Re-serializing the parsed date must reproduce the input exactly, so
/// strings that merely look like dates ("2024-02-30") are rejected along
/// with everything chrono refuses to parse.
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    if date.format("%Y-%m-%d").to_string() != input {
        return None;
    }
    Some(date)
}

/// Build the window from the start date's midnight to the end date's last
/// millisecond, both in UTC
fn window_between(start: NaiveDate, end: NaiveDate) -> Option<TimeWindow> {
    let time_min = start.and_hms_opt(0, 0, 0)?.and_utc();
    let time_max = end.and_hms_milli_opt(23, 59, 59, 999)?.and_utc();
    Some(TimeWindow { time_min, time_max })
}

/// Resolve list query parameters into an inclusive UTC time window
///
/// Either `day` alone or both `start` and `end` select the window. The
/// system clock is never consulted: an empty selection is an error, never
/// "today".
pub fn resolve_range(
    day: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> ServiceResult<TimeWindow> {
    match (day, start, end) {
        (Some(day), _, _) => {
            let date = parse_day(day)
                .ok_or_else(|| validation_error("Invalid day format. Expected YYYY-MM-DD."))?;
            window_between(date, date)
                .ok_or_else(|| validation_error("Invalid day format. Expected YYYY-MM-DD."))
        }
        (None, Some(start), Some(end)) => {
            let start_date = parse_day(start).ok_or_else(|| {
                validation_error("Invalid start or end date format. Expected YYYY-MM-DD.")
            })?;
            let end_date = parse_day(end).ok_or_else(|| {
                validation_error("Invalid start or end date format. Expected YYYY-MM-DD.")
            })?;
            if start_date > end_date {
                return Err(validation_error("Start date is after end date."));
            }
            window_between(start_date, end_date).ok_or_else(|| {
                validation_error("Invalid start or end date format. Expected YYYY-MM-DD.")
            })
        }
        _ => Err(validation_error(
            "Day parameter is required or both start and end parameters are required",
        )),
    }
}
