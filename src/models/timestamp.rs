//! Timestamp parsing and formatting shared by the DTOs
//!
//! Full timestamps are stored and returned as UTC (RFC 3339 on the wire).
//! Incoming values may also omit the offset (`2024-07-09T22:53:15.123`),
//! which is how most .NET and browser clients emit local date-times; those
//! are taken as UTC. Update/publish stamps travel as plain dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, or an offset-less one taken as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid timestamp '{}'", raw))
}

/// Serde adapter for optional timestamps in request bodies
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Midnight UTC of the given date
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Calendar date of an optional timestamp
pub fn date_of(timestamp: Option<DateTime<Utc>>) -> Option<NaiveDate> {
    timestamp.map(|ts| ts.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let ts = parse_timestamp("2024-07-09T22:53:15+02:00").unwrap();
        assert_eq!(ts.hour(), 20);
        assert_eq!(ts.day(), 9);
    }

    #[test]
    fn test_parse_offsetless_timestamp() {
        let ts = parse_timestamp("2024-07-09T22:53:15.123").unwrap();
        assert_eq!(ts.hour(), 22);
        assert_eq!(ts.timestamp_subsec_millis(), 123);

        let ts = parse_timestamp("2024-07-09 22:53:15").unwrap();
        assert_eq!(ts.minute(), 53);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-13-40T00:00:00").is_err());
    }

    #[test]
    fn test_start_of_day_and_date_of() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        let ts = start_of_day(date);
        assert_eq!(ts.hour(), 0);
        assert_eq!(date_of(Some(ts)), Some(date));
        assert_eq!(date_of(None), None);
    }

    #[test]
    fn test_deserialize_option() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "deserialize_option")]
            at: Option<DateTime<Utc>>,
        }

        let body: Body = serde_json::from_str(r#"{"at":"2024-07-09T10:00:00Z"}"#).unwrap();
        assert_eq!(body.at.map(|t| t.hour()), Some(10));

        let body: Body = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.at.is_none());

        let body: Body = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(body.at.is_none());

        assert!(serde_json::from_str::<Body>(r#"{"at":"nope"}"#).is_err());
    }
}
