//! Timestamp parsing and relative display formatting for the price list

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};

const TIME_FORMAT: &str = "%-I:%M %p";

/// Byte offset of the `.` before fractional seconds in `YYYY-MM-DDTHH:MM:SS.`
const FRACTION_SEPARATOR_AT: usize = 19;

/// Parse a feed timestamp into epoch milliseconds
///
/// Fractional seconds are required and surrounding whitespace is rejected.
/// The offset may be `+08:00`, `+0800` or `Z`.
pub fn parse_iso8601_millis(raw: &str) -> Option<i64> {
    if raw.get(FRACTION_SEPARATOR_AT..FRACTION_SEPARATOR_AT + 1) != Some(".") {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Format a reading time relative to `now`
///
/// Both instants are placed on calendar days in `now`'s timezone and the
/// whole-day difference picks the pattern:
/// - same day: `10:15 AM`
/// - one day back: `<yesterday_label>, 11:15 AM`
/// - two to six days back: `Mon, 10:15 AM`
/// - anything else in the same year: `Jun 28, 8:00 PM`
/// - anything else: `28 Jun 2017, 8:00 PM`
///
/// A timestamp of zero or below means "no reading" and yields an empty string.
/// Milliseconds are truncated to whole seconds first.
pub fn format_display_timestamp<Tz: TimeZone>(
    timestamp_millis: i64,
    now: &DateTime<Tz>,
    yesterday_label: &str,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if timestamp_millis <= 0 {
        return String::new();
    }

    let Some(moment_utc) = DateTime::<Utc>::from_timestamp(timestamp_millis / 1000, 0) else {
        return String::new();
    };
    let moment = moment_utc.with_timezone(&now.timezone());

    let day_difference = (now.date_naive() - moment.date_naive()).num_days();

    match day_difference {
        0 => moment.format(TIME_FORMAT).to_string(),
        1 => format!("{}, {}", yesterday_label, moment.format(TIME_FORMAT)),
        2..=6 => moment.format("%a, %-I:%M %p").to_string(),
        _ if moment.year() == now.year() => moment.format("%b %-d, %-I:%M %p").to_string(),
        _ => moment.format("%-d %b %Y, %-I:%M %p").to_string(),
    }
}
