use chrono::{DateTime, NaiveDateTime};

const SHORT_FORMAT: &str = "%b %-d, %Y %H:%M";
const LONG_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses either a naive ISO-8601 timestamp or an RFC 3339 one with an offset.
/// Timestamps with an offset are converted to UTC.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.naive_utc()),
        Err(_) => s.parse::<NaiveDateTime>(),
    }
}

/// e.g. `May 1, 2024 10:20`
#[must_use]
pub fn format_short(ts: &NaiveDateTime) -> String {
    ts.format(SHORT_FORMAT).to_string()
}

/// e.g. `2024-05-01 10:20:30`
#[must_use]
pub fn format_long(ts: &NaiveDateTime) -> String {
    ts.format(LONG_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-05-01T10:20:30", "2024-05-01 10:20:30")]
    #[case("2024-05-01T10:20:30.123456", "2024-05-01 10:20:30")]
    #[case("2024-05-01T10:20:30Z", "2024-05-01 10:20:30")]
    #[case("2024-05-01T12:20:30+02:00", "2024-05-01 10:20:30")]
    fn parse_then_format(#[case] input: &str, #[case] expected: &str) {
        let ts = parse_timestamp(input).unwrap();
        assert_eq!(format_long(&ts), expected);
    }

    #[test]
    fn short_format() {
        let ts = parse_timestamp("2024-05-01T09:05:00").unwrap();
        assert_eq!(format_short(&ts), "May 1, 2024 09:05");
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2024-13-01T00:00:00")]
    fn invalid(#[case] input: &str) {
        assert!(parse_timestamp(input).is_err());
    }
}
