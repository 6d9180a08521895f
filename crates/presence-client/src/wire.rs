// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request bodies and the response envelope.

use presence_core::{AccelSample, ApiFailure, ApiResult};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope {
    /// Splits the envelope into its success payload or a rejection.
    pub fn into_result(self) -> ApiResult<Option<serde_json::Value>> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(ApiFailure::rejected(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "request rejected".to_string()),
            ))
        }
    }
}

/// Any request body plus the submission timestamp.
#[derive(Debug, Serialize)]
pub struct Stamped<'a, T: Serialize> {
    #[serde(flatten)]
    pub body: &'a T,
    pub ts: String,
}

#[derive(Debug, Serialize)]
pub struct QrGenerateBody<'a> {
    pub course_id: &'a str,
    pub session_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GpsBody<'a> {
    pub device_id: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub accuracy_m: u32,
}

#[derive(Debug, Serialize)]
pub struct AccelBody<'a> {
    pub device_id: &'a str,
    pub samples: &'a [AccelSample],
}
