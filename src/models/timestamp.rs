// Timestamp helpers shared by the domain models

//! Creation timestamps are kept at millisecond precision and rendered as
//! RFC 3339 with a `Z` suffix, e.g. `2020-06-01T23:59:59.999Z`.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time, truncated to whole milliseconds
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render a timestamp the way it appears on the wire
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter used with `#[serde(with = "timestamp")]`
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
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_keeps_milliseconds() {
        let ts = Utc.with_ymd_and_hms(2020, 6, 1, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999);
        assert_eq!(format(&ts), "2020-06-01T23:59:59.999Z");
    }

    #[test]
    fn test_format_pads_whole_seconds() {
        let ts = Utc.with_ymd_and_hms(2020, 6, 5, 0, 0, 0).unwrap();
        assert_eq!(format(&ts), "2020-06-05T00:00:00.000Z");
    }

    #[test]
    fn test_now_has_no_sub_millisecond_part() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
