// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote attendance and telemetry service contract.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::types::{
    AccelLatest, AccelSample, CheckinRequest, CheckinResult, GpsHistoryPoint, GpsSample,
    PresenceStatus, QrTicket,
};

/// Default number of history points requested from `/telemetry/gps/history`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 200;

/// Typed wrappers around each service endpoint.
///
/// Every method resolves to an [`ApiResult`]; transport and decoding failures
/// are folded into the error arm, never raised. No method retries.
#[async_trait]
pub trait PresenceApi: Send + Sync + 'static {
    /// `POST /presence/qr/generate`
    async fn generate_qr(&self, course_id: &str, session_id: &str) -> ApiResult<QrTicket>;

    /// `POST /presence/checkin`
    async fn checkin(&self, request: &CheckinRequest) -> ApiResult<CheckinResult>;

    /// `GET /presence/status`
    async fn presence_status(
        &self,
        user_id: &str,
        course_id: &str,
        session_id: &str,
    ) -> ApiResult<PresenceStatus>;

    /// `POST /telemetry/gps`
    async fn post_gps(&self, device_id: &str, sample: &GpsSample) -> ApiResult<()>;

    /// `GET /telemetry/gps/latest`
    async fn gps_latest(&self, device_id: &str) -> ApiResult<GpsSample>;

    /// `GET /telemetry/gps/history`. `None` requests [`DEFAULT_HISTORY_LIMIT`] points.
    async fn gps_history(
        &self,
        device_id: &str,
        limit: Option<u32>,
    ) -> ApiResult<Vec<GpsHistoryPoint>>;

    /// `POST /telemetry/accel`
    async fn post_accel(&self, device_id: &str, samples: &[AccelSample]) -> ApiResult<()>;

    /// `GET /telemetry/accel/latest`
    async fn accel_latest(&self, device_id: &str) -> ApiResult<AccelLatest>;
}
