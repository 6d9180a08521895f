// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ISO-8601 timestamp helpers.
//!
//! The service exchanges timestamps as RFC 3339 strings with millisecond
//! precision and a `Z` suffix (`2026-03-02T08:15:30.125Z`). Readers also
//! accept offset-less local timestamps, which are taken as UTC.

use chrono::{DateTime, NaiveDateTime, ParseError, SecondsFormat, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Formats a timestamp the way the service expects it on the wire.
pub fn to_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, already in wire format.
pub fn iso_now() -> String {
    to_iso(&Utc::now())
}

/// Parses a service timestamp.
///
/// RFC 3339 first; a timestamp without an offset is read as UTC. The returned
/// error is the RFC 3339 one.
pub fn parse_iso(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let strict = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => return Ok(ts.with_timezone(&Utc)),
        Err(err) => err,
    };
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or(strict)
}

/// Serde adapter for `DateTime<Utc>` fields.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<DateTime<Utc>>` fields. Pair with `#[serde(default)]`.
pub mod iso8601_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_some(&super::to_iso(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => super::parse_iso(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
