// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Parse either an RFC 3339 timestamp or a plain calendar date.
///
/// Older clients stored the date of the most recent workout instead
/// of a full timestamp. Dates are interpreted as midnight UTC.
pub fn parse_timestamp_lenient(input: &str) -> Result<Timestamp, jiff::Error> {
    match input.parse::<Timestamp>() {
        Ok(timestamp) => Ok(timestamp),
        Err(err) => {
            let Ok(date) = input.parse::<Date>() else {
                return Err(err);
            };
            start_of_day_utc(date)
        }
    }
}

pub fn start_of_day_utc(date: Date) -> Result<Timestamp, jiff::Error> {
    date.to_zoned(TimeZone::UTC).map(|zoned| zoned.timestamp())
}

/// (De-)serialize an optional timestamp as a string or `null`.
pub(crate) mod serde_timestamp_opt {
    use jiff::Timestamp;
    use serde::{Deserialize as _, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub(crate) fn serialize<S>(value: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => serializer.collect_str(timestamp),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(input) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        super::parse_timestamp_lenient(&input)
            .map(Some)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_timestamp() {
        let ts = parse_timestamp_lenient("2024-03-05T18:30:00Z").unwrap();
        assert_eq!("2024-03-05T18:30:00Z", ts.to_string());
    }

    #[test]
    fn parse_date_as_midnight_utc() {
        let ts = parse_timestamp_lenient("2024-03-05").unwrap();
        assert_eq!("2024-03-05T00:00:00Z", ts.to_string());
    }

    #[test]
    fn reject_garbage() {
        assert!(parse_timestamp_lenient("yesterday").is_err());
        assert!(parse_timestamp_lenient("").is_err());
    }
}
