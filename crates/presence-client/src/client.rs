// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the attendance and telemetry service.

use async_trait::async_trait;
use presence_config::model::ClientConfig;
use presence_core::time::iso_now;
use presence_core::traits::api::DEFAULT_HISTORY_LIMIT;
use presence_core::{
    AccelLatest, AccelSample, ApiFailure, ApiResult, CheckinRequest, CheckinResult,
    GpsHistoryPoint, GpsSample, PresenceApi, PresenceError, PresenceStatus, QrTicket,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::wire::{AccelBody, Envelope, GpsBody, QrGenerateBody, Stamped};

/// HTTP client for the presence service.
///
/// Connection pooling comes from the shared `reqwest::Client`. There are no
/// retries and no request timeout beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct PresenceClient {
    client: reqwest::Client,
    base_url: String,
}

impl PresenceClient {
    /// Creates a client rooted at `base_url` (e.g. `https://presensi.example.ac.id`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, PresenceError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("presence/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PresenceError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, PresenceError> {
        Self::new(config.base_url.trim())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<Option<serde_json::Value>> {
        let stamped = Stamped {
            body,
            ts: iso_now(),
        };
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&stamped)
            .send()
            .await;
        decode_envelope(endpoint, response).await
    }

    async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<Option<serde_json::Value>> {
        let url = reqwest::Url::parse_with_params(&self.url(endpoint), query).map_err(|e| {
            ApiFailure::transport(format!("invalid request URL for {endpoint}: {e}"))
        })?;
        let response = self.client.get(url).send().await;
        decode_envelope(endpoint, response).await
    }
}

/// Folds a response (or send error) into the envelope's success payload.
///
/// The body is decoded whatever the HTTP status, because the service reports
/// rejections as `{ok: false, error}` on non-2xx responses too.
async fn decode_envelope(
    endpoint: &str,
    response: Result<reqwest::Response, reqwest::Error>,
) -> ApiResult<Option<serde_json::Value>> {
    let response = response.map_err(|e| {
        warn!(endpoint, error = %e, "request failed");
        ApiFailure::transport(format!("request to {endpoint} failed: {e}"))
    })?;

    let status = response.status();
    debug!(endpoint, status = %status, "response received");

    let body = response.text().await.map_err(|e| {
        ApiFailure::transport(format!("failed to read {endpoint} response body: {e}"))
    })?;

    let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
        warn!(endpoint, status = %status, "undecodable response body");
        ApiFailure::decode(format!("{endpoint} returned {status} with unreadable body: {e}"))
    })?;

    envelope.into_result().inspect_err(|failure| {
        debug!(endpoint, status = %status, error = %failure, "request rejected");
    })
}

/// Decodes a required `data` payload.
fn required<T: DeserializeOwned>(endpoint: &str, data: Option<serde_json::Value>) -> ApiResult<T> {
    let data = data.ok_or_else(|| ApiFailure::decode(format!("{endpoint} response has no data")))?;
    serde_json::from_value(data)
        .map_err(|e| ApiFailure::decode(format!("{endpoint} data has unexpected shape: {e}")))
}

#[async_trait]
impl PresenceApi for PresenceClient {
    async fn generate_qr(&self, course_id: &str, session_id: &str) -> ApiResult<QrTicket> {
        const EP: &str = "/presence/qr/generate";
        let data = self
            .post(EP, &QrGenerateBody {
                course_id,
                session_id,
            })
            .await?;
        required(EP, data)
    }

    async fn checkin(&self, request: &CheckinRequest) -> ApiResult<CheckinResult> {
        const EP: &str = "/presence/checkin";
        let data = self.post(EP, request).await?;
        required(EP, data)
    }

    async fn presence_status(
        &self,
        user_id: &str,
        course_id: &str,
        session_id: &str,
    ) -> ApiResult<PresenceStatus> {
        const EP: &str = "/presence/status";
        let data = self
            .get(EP, &[
                ("user_id", user_id),
                ("course_id", course_id),
                ("session_id", session_id),
            ])
            .await?;
        required(EP, data)
    }

    async fn post_gps(&self, device_id: &str, sample: &GpsSample) -> ApiResult<()> {
        self.post("/telemetry/gps", &GpsBody {
            device_id,
            lat: sample.lat,
            lng: sample.lng,
            accuracy_m: sample.accuracy_m,
        })
        .await
        .map(|_| ())
    }

    async fn gps_latest(&self, device_id: &str) -> ApiResult<GpsSample> {
        const EP: &str = "/telemetry/gps/latest";
        let data = self.get(EP, &[("device_id", device_id)]).await?;
        required(EP, data)
    }

    async fn gps_history(
        &self,
        device_id: &str,
        limit: Option<u32>,
    ) -> ApiResult<Vec<GpsHistoryPoint>> {
        const EP: &str = "/telemetry/gps/history";
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).to_string();
        let data = self
            .get(EP, &[("device_id", device_id), ("limit", &limit)])
            .await?;
        match data {
            Some(points @ serde_json::Value::Array(_)) => serde_json::from_value(points)
                .map_err(|e| ApiFailure::decode(format!("{EP} data has unexpected shape: {e}"))),
            // Anything other than a list is an empty trail.
            _ => Ok(Vec::new()),
        }
    }

    async fn post_accel(&self, device_id: &str, samples: &[AccelSample]) -> ApiResult<()> {
        self.post("/telemetry/accel", &AccelBody { device_id, samples })
            .await
            .map(|_| ())
    }

    async fn accel_latest(&self, device_id: &str) -> ApiResult<AccelLatest> {
        const EP: &str = "/telemetry/accel/latest";
        let data = self.get(EP, &[("device_id", device_id)]).await?;
        required(EP, data)
    }
}
