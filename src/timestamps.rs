//! Parsing of device timestamps and rendering of stored instants.
//!
//! Devices send either RFC 3339 strings or a naive `YYYY-MM-DD HH:MM:SS`
//! wall-clock value. Naive values carry no zone and are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::America::Mexico_City;

/// Naive layouts accepted after RFC 3339 fails. `%.f` also matches "no fraction".
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Offset-carrying layouts with a space separator, which RFC 3339 parsing rejects.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Day/month without padding, 24-hour clock, as rendered for `es-MX`.
const LOCAL_FORMAT: &str = "%-d/%-m/%Y, %-H:%M:%S";

/// Parse a device-supplied timestamp into an absolute instant.
///
/// Returns `None` for empty input or anything that is not a real calendar
/// date and time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Mexico City wall-clock rendering, e.g. `5/4/2025, 8:32:10`.
pub fn format_local(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Mexico_City)
        .format(LOCAL_FORMAT)
        .to_string()
}

/// ISO-8601 UTC with milliseconds, e.g. `2025-04-05T14:32:10.000Z`.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
