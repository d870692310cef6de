use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Naive ISO 8601 date-times, as written by clients that do not record an offset.
const NAIVE_WITH_SUBSECOND: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Parse an RFC 3339 string, falling back to a naive ISO 8601 date-time read as UTC.
pub fn parse_lenient(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    match OffsetDateTime::parse(s, &Rfc3339) {
        Ok(datetime) => Ok(datetime),
        Err(err) => PrimitiveDateTime::parse(s, NAIVE_WITH_SUBSECOND)
            .or_else(|_| PrimitiveDateTime::parse(s, NAIVE))
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|_| err),
    }
}

/// Deserialize an RFC 3339 (or naive ISO 8601) string into an OffsetDateTime
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_lenient(&s).map_err(serde::de::Error::custom)
}

/// Serialize an OffsetDateTime into an RFC 3339 formatted string
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = datetime
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_lenient("2024-05-01T14:30:00+02:00").unwrap();
        assert_eq!(parsed, datetime!(2024-05-01 12:30:00 UTC));
    }

    #[test]
    fn parses_naive_as_utc() {
        assert_eq!(
            parse_lenient("2024-05-01T12:30:00").unwrap(),
            datetime!(2024-05-01 12:30:00 UTC)
        );
        assert_eq!(
            parse_lenient("2024-05-01T12:30:00.250").unwrap(),
            datetime!(2024-05-01 12:30:00.25 UTC)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_lenient("yesterday").is_err());
        assert!(parse_lenient("").is_err());
    }
}
