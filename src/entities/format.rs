// Input formats shared by the record types.

use chrono::NaiveDateTime;
use serde::{de::Error, Deserialize, Deserializer};

const WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f";
const WITH_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// Parse an ISO-8601 local date-time; seconds and fractions are optional
pub fn parse_local_date_time(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, WITH_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(value, WITH_MINUTES))
}

pub fn local_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_local_date_time(&raw)
        .map_err(|e| D::Error::custom(format!("invalid local date-time '{}': {}", raw, e)))
}

/// Incoming ids are advisory; `null` reads as unsaved
pub fn nullable_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}
