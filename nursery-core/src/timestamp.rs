//! Fixed-width RFC 3339 timestamps.
//!
//! Stored and wire timestamps always carry microsecond precision and a `Z`
//! suffix so that string order matches chronological order.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time at stored precision
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Render a timestamp in the canonical stored form.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse any RFC 3339 timestamp into UTC.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let frac = whole + chrono::Duration::microseconds(5);

        assert_eq!(format(&whole), "2024-03-01T12:00:00.000000Z");
        assert_eq!(format(&frac), "2024-03-01T12:00:00.000005Z");
        assert!(format(&whole) < format(&frac));
    }

    #[test]
    fn test_now_survives_round_trip() {
        let ts = now();
        assert_eq!(parse(&format(&ts)), Some(ts));
    }

    #[test]
    fn test_parse_accepts_offsets() {
        let parsed = parse("2024-03-01T14:00:00+02:00").unwrap();
        assert_eq!(format(&parsed), "2024-03-01T12:00:00.000000Z");
        assert!(parse("yesterday").is_none());
    }
}
