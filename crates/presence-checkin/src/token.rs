// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scanned-token resolution.
//!
//! A QR payload names its course session in one of three encodings. The
//! structured ones are tried in order until one yields a course or session id:
//!
//! 1. Claims token: `header.<base64 JSON claims>.signature`
//! 2. Absolute URL with `course_id` / `session_id` query parameters
//!
//! Anything else is read as delimited text (`COURSE|SESSION`), which always
//! produces ids, so resolution never fails. Signatures are not verified; the
//! raw payload goes to the server untouched.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use presence_core::ResolvedSession;
use serde_json::Value;
use tracing::debug;

/// Course id used when a delimited token is empty.
pub const DEFAULT_COURSE_ID: &str = "default";

/// Session id used when a delimited token carries none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Course and session ids pulled out of a token by one parser.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Extracted {
    course_id: String,
    session_id: String,
}

impl Extracted {
    /// A parser only wins if it found at least one id.
    fn non_empty(self) -> Option<Self> {
        (!self.course_id.is_empty() || !self.session_id.is_empty()).then_some(self)
    }
}

type Parser = fn(&str) -> Option<Extracted>;

/// Resolves raw QR payloads into session identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenResolver;

impl TokenResolver {
    const PARSERS: [(&'static str, Parser); 2] = [("claims", parse_claims), ("url", parse_url)];

    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, raw_token: &str) -> ResolvedSession {
        let (encoding, extracted) = Self::PARSERS
            .iter()
            .find_map(|(name, parse)| parse(raw_token).map(|e| (*name, e)))
            .unwrap_or_else(|| ("delimited", delimited(raw_token)));

        debug!(
            encoding,
            course_id = %extracted.course_id,
            session_id = %extracted.session_id,
            "token resolved"
        );

        ResolvedSession {
            course_id: extracted.course_id,
            session_id: extracted.session_id,
            raw_token: raw_token.to_string(),
        }
    }
}

fn parse_claims(token: &str) -> Option<Extracted> {
    let mut segments = token.split('.');
    let (Some(_), Some(claims), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = decode_base64(claims)?;
    let Value::Object(claims) = serde_json::from_slice::<Value>(&bytes).ok()? else {
        return None;
    };

    let field = |name: &str| match claims.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Extracted {
        course_id: field("course_id"),
        session_id: field("session_id"),
    }
    .non_empty()
}

/// Claims segments show up in both alphabets, with and without padding.
fn decode_base64(segment: &str) -> Option<Vec<u8>> {
    [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD_NO_PAD, &STANDARD]
        .into_iter()
        .find_map(|engine| engine.decode(segment).ok())
}

fn parse_url(token: &str) -> Option<Extracted> {
    let url = url::Url::parse(token).ok()?;
    let mut course_id = String::new();
    let mut session_id = String::new();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "course_id" if course_id.is_empty() => course_id = value.into_owned(),
            "session_id" if session_id.is_empty() => session_id = value.into_owned(),
            _ => {}
        }
    }
    Extracted {
        course_id,
        session_id,
    }
    .non_empty()
}

fn delimited(token: &str) -> Extracted {
    let mut parts = token.split('|');
    let course_id = match parts.next() {
        Some(first) if !first.is_empty() => first,
        _ => token,
    };
    let session_id = parts.next().filter(|s| !s.is_empty());

    Extracted {
        course_id: if course_id.is_empty() {
            DEFAULT_COURSE_ID.to_string()
        } else {
            course_id.to_string()
        },
        session_id: session_id.unwrap_or(DEFAULT_SESSION_ID).to_string(),
    }
}
