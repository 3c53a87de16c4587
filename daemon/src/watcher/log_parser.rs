//! Server log line parsing.
//!
//! Lines look like `[2020-02-08 16:10:39 MST] [INFO]: ricky_ninja joined the game`.
//! The zone abbreviation in the text must be present and well formed, but its
//! value is ignored; timestamps are read as wall clock time in the configured
//! zone.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Separates the `[time] [level]` prefix from the message body.
const BODY_DELIMITER: &str = "]: ";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("can't parse line: {0}")]
    MissingDelimiter(String),

    #[error("can't parse time: {0}")]
    MissingTimestamp(String),

    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("timestamp {value:?} does not exist in {zone}")]
    NonexistentLocalTime { value: String, zone: Tz },
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<Tz>,
    /// Text after the `]: ` delimiter.
    pub body: String,
}

/// Parse a raw line, interpreting its timestamp in `zone`.
pub fn parse_line(line: &str, zone: Tz) -> Result<LogRecord, ParseError> {
    let (prefix, body) = line
        .split_once(BODY_DELIMITER)
        .ok_or_else(|| ParseError::MissingDelimiter(line.to_string()))?;

    let (stamp, _level) = prefix
        .split_once(']')
        .ok_or_else(|| ParseError::MissingTimestamp(prefix.to_string()))?;

    let stamp = stamp.replace(['[', ']'], "");
    let timestamp = parse_timestamp(&stamp, zone)?;

    Ok(LogRecord {
        timestamp,
        body: body.to_string(),
    })
}

/// `YYYY-MM-DD HH:MM:SS ZZZ`. `ZZZ` must look like a zone abbreviation but its
/// value is not used.
fn parse_timestamp(value: &str, zone: Tz) -> Result<DateTime<Tz>, ParseError> {
    let invalid = |source| ParseError::InvalidTimestamp {
        value: value.to_string(),
        source,
    };

    // Padding inside the brackets leaves an empty token on one side.
    let (local, abbrev) = value.rsplit_once(' ').unwrap_or((value, ""));
    if local != local.trim_start() || !is_zone_abbreviation(abbrev) {
        return Err(invalid(None));
    }
    let naive = NaiveDateTime::parse_from_str(local, TIMESTAMP_FORMAT)
        .map_err(|e| invalid(Some(e)))?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(ts) => Ok(ts),
        // DST fold: the server cannot tell us which one, take the first.
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(ParseError::NonexistentLocalTime {
            value: value.to_string(),
            zone,
        }),
    }
}

/// `MST`, `CEST`, `ChST`, or a numeric form such as `+07`, `-0330`, `GMT+7`.
fn is_zone_abbreviation(token: &str) -> bool {
    if (3..=5).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_alphabetic()) {
        return true;
    }

    let offset = token
        .strip_prefix("GMT")
        .or_else(|| token.strip_prefix("UTC"))
        .unwrap_or(token);
    let Some(digits) = offset.strip_prefix(['+', '-']) else {
        return false;
    };
    (1..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::America::{Denver, Phoenix};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_join_line() {
        let record =
            parse_line("[2020-02-08 16:10:39 MST] [INFO]: ricky_ninja joined the game", Phoenix)
                .unwrap();

        assert_eq!(
            record.timestamp,
            Phoenix.with_ymd_and_hms(2020, 2, 8, 16, 10, 39).unwrap()
        );
        assert_eq!(record.body, "ricky_ninja joined the game");
    }

    #[test]
    fn test_zone_comes_from_config_not_text() {
        let record = parse_line("[2020-02-08 16:10:39 EST] [INFO]: x joined the game", Tz::UTC)
            .unwrap();
        assert_eq!(record.timestamp.hour(), 16);
        assert_eq!(record.timestamp.timezone(), Tz::UTC);
    }

    #[test]
    fn test_body_keeps_later_delimiters() {
        let record =
            parse_line("[2020-02-08 16:11:05 MST] [INFO]: <ricky_ninja> a]: b", Phoenix).unwrap();
        assert_eq!(record.body, "<ricky_ninja> a]: b");
    }

    #[test]
    fn test_missing_delimiter() {
        let err = parse_line("just some text", Phoenix).unwrap_err();
        assert_eq!(err, ParseError::MissingDelimiter("just some text".to_string()));
    }

    #[test]
    fn test_missing_timestamp_bracket() {
        for line in ["2020-02-08 16:10:39 MST INFO]: x", "[INFO]: x joined the game"] {
            let err = parse_line(line, Phoenix).unwrap_err();
            assert!(matches!(err, ParseError::MissingTimestamp(_)), "{line}: {err:?}");
        }
    }

    #[test]
    fn test_malformed_timestamp() {
        for line in [
            "[2020-02-30 16:10:39 MST] [INFO]: x joined the game",
            "[yesterday] [INFO]: x joined the game",
            "[2020-02-08 16:10:39] [INFO]: x joined the game",
            "[2020-02-08 16:10:39 123] [INFO]: x joined the game",
            "[2020-02-08 16:10:39 -] [INFO]: x joined the game",
            "[2020-02-08 16:10:39 MOUNTAIN] [INFO]: x joined the game",
            "[ 2020-02-08 16:10:39 MST ] [INFO]: x joined the game",
            "[2020-02-08 16:10:39 MST ] [INFO]: x joined the game",
            "[ 2020-02-08 16:10:39 MST] [INFO]: x joined the game",
        ] {
            let err = parse_line(line, Phoenix).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidTimestamp { .. }),
                "{line}: {err:?}"
            );
        }
    }

    #[test]
    fn test_accepted_zone_tokens() {
        for token in ["MST", "UTC", "CEST", "ChST", "+07", "-0330", "GMT+7", "UTC-03"] {
            let line = format!("[2020-02-08 16:10:39 {token}] [INFO]: x joined the game");
            assert!(parse_line(&line, Phoenix).is_ok(), "{token}");
        }
    }

    #[test]
    fn test_dst_gap_is_an_error() {
        // 02:30 never happened in Denver on 2020-03-08.
        let err = parse_line("[2020-03-08 02:30:00 MDT] [INFO]: x joined the game", Denver)
            .unwrap_err();
        assert!(matches!(err, ParseError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn test_parse_is_repeatable() {
        let line = "[2020-02-08 16:11:09 MST] [INFO]: ricky_ninja left the game";
        assert_eq!(parse_line(line, Phoenix), parse_line(line, Phoenix));
    }
}
