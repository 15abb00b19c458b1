use chrono::{Duration, NaiveDate, NaiveTime};

use crate::error::ValidationError;

/// Alarm times are stored and displayed as the "HH:MM" the user typed.
pub const CLOCK_FMT: &str = "%H:%M";

/// This is the standard way of converting a date to a display heading in deskmate.
pub fn date_heading(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats net elapsed time for the stopwatch display. Hours widen past two digits instead of
/// wrapping.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
}

/// Parses a 24-hour "HH:MM" value.
pub fn parse_clock(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input.trim(), CLOCK_FMT)
        .map_err(|_| ValidationError::InvalidClockTime(input.to_string()))
}
