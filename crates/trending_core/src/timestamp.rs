use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    // Day-of-year form used by the report generators, e.g. 2024:183:00:00:00.000
    "%Y:%j:%H:%M:%S%.f",
];

/// Parses a period boundary as published in a report table.
///
/// Accepts RFC 3339, naive ISO date-times (assumed UTC), bare ISO dates,
/// `YYYY:DOY:hh:mm:ss[.fff]`, and plain numbers as seconds since
/// 1998-01-01T00:00:00 TT.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite())
        .and_then(from_mission_seconds)
}

/// Leap seconds inserted after 1998 are not accounted for.
fn from_mission_seconds(secs: f64) -> Option<DateTime<Utc>> {
    // 1998-01-01T00:00:00 TT expressed in UTC (TT - UTC was 63.184 s).
    let epoch = NaiveDate::from_ymd_opt(1997, 12, 31)?
        .and_hms_milli_opt(23, 58, 56, 816)?
        .and_utc();
    let offset = TimeDelta::try_milliseconds((secs * 1000.0).round() as i64)?;
    epoch.checked_add_signed(offset)
}
