//! Calendar-day normalization for scraped chart timestamps
//!
//! Chart sources hand back timestamps in whatever shape their plotting
//! library was fed: bare dates, naive datetimes, RFC 3339 with offsets, or
//! epoch milliseconds. Everything is reduced to a UTC `YYYY-MM-DD` string so
//! that series from different sources line up by plain string equality.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Naive datetime layouts seen in Plotly traces (interpreted as UTC)
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Normalize a timestamp string to `YYYY-MM-DD` (UTC), discarding time of day.
///
/// Returns `None` when the string is not a recognizable date.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).format(DATE_FORMAT).to_string());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date().format(DATE_FORMAT).to_string());
        }
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|date| date.format(DATE_FORMAT).to_string())
}

/// Normalize a JSON timestamp: strings go through [`normalize_date`],
/// numbers are epoch milliseconds.
pub fn normalize_timestamp_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => normalize_date(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .map(|dt| dt.format(DATE_FORMAT).to_string())
        }
        _ => None,
    }
}

/// Current time as epoch milliseconds
pub fn epoch_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// Epoch milliseconds to RFC 3339 with millisecond precision, e.g. `2024-05-01T00:00:00.000Z`
pub fn millis_to_rfc3339(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_plain_date() {
        assert_eq!(normalize_date("2024-03-05"), Some("2024-03-05".to_string()));
    }

    #[test]
    fn test_normalize_discards_time_of_day() {
        assert_eq!(normalize_date("2024-03-05 23:59:59"), Some("2024-03-05".to_string()));
        assert_eq!(normalize_date("2024-03-05T08:00:00"), Some("2024-03-05".to_string()));
        assert_eq!(normalize_date("2024-03-05T08:00:00.123"), Some("2024-03-05".to_string()));
    }

    #[test]
    fn test_normalize_converts_offsets_to_utc() {
        // 01:00 at +05:00 is still the previous day in UTC
        assert_eq!(
            normalize_date("2024-03-05T01:00:00+05:00"),
            Some("2024-03-04".to_string())
        );
        assert_eq!(normalize_date("2024-03-05T00:00:00Z"), Some("2024-03-05".to_string()));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_date("not a date"), None);
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("2024-13-40"), None);
    }

    #[test]
    fn test_normalize_timestamp_value() {
        assert_eq!(
            normalize_timestamp_value(&json!("2021-01-02T00:00:00")),
            Some("2021-01-02".to_string())
        );
        // 2021-01-02T00:00:00Z
        assert_eq!(
            normalize_timestamp_value(&json!(1609545600000i64)),
            Some("2021-01-02".to_string())
        );
        assert_eq!(normalize_timestamp_value(&json!(null)), None);
    }

    #[test]
    fn test_millis_to_rfc3339() {
        assert_eq!(
            millis_to_rfc3339(1714521600000),
            Some("2024-05-01T00:00:00.000Z".to_string())
        );
    }
}
