//! Timestamp parsing and the "touch" rule for updated_at.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Four-digit years only; anything wider breaks the fixed-width column text.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Accepts RFC 3339, a naive date-time (taken as UTC) or a bare date
/// (midnight UTC). Result is truncated to microseconds, the stored precision.
/// Years outside 1..=9999 (after conversion to UTC) are rejected.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    parse_any(s.trim()).filter(|dt| YEAR_RANGE.contains(&dt.year()))
}

fn parse_any(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(6));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().trunc_subsecs(6));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// serde `deserialize_with` adapter for [`parse`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {raw:?}")))
}

pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next updated_at for a row last touched at `prev`: the current time, but
/// always at least one microsecond after `prev`.
pub fn touch(prev: DateTime<Utc>) -> DateTime<Utc> {
    now().max(prev + Duration::microseconds(1))
}
