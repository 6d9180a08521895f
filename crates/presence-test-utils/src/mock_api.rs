// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock remote service.
//!
//! Every endpoint answers with a canned success until scripted otherwise.
//! All calls are recorded in order so tests can assert on what the
//! orchestrator attempted.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use presence_core::{
    AccelLatest, AccelSample, ApiFailure, ApiResult, CheckinRequest, CheckinResult,
    GpsHistoryPoint, GpsSample, PresenceApi, PresenceStatus, QrTicket,
};

use crate::lock;

/// One remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GenerateQr,
    Checkin,
    PresenceStatus,
    PostGps,
    GpsLatest,
    GpsHistory,
    PostAccel,
    AccelLatest,
}

impl Endpoint {
    /// The four reads issued after the check-in submission.
    pub const FETCHES: [Endpoint; 4] = [
        Endpoint::PresenceStatus,
        Endpoint::AccelLatest,
        Endpoint::GpsLatest,
        Endpoint::GpsHistory,
    ];
}

/// A recorded call with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GenerateQr {
        course_id: String,
        session_id: String,
    },
    Checkin(CheckinRequest),
    PresenceStatus {
        user_id: String,
        course_id: String,
        session_id: String,
    },
    PostGps {
        device_id: String,
        sample: GpsSample,
    },
    GpsLatest {
        device_id: String,
    },
    GpsHistory {
        device_id: String,
        limit: Option<u32>,
    },
    PostAccel {
        device_id: String,
        samples: Vec<AccelSample>,
    },
    AccelLatest {
        device_id: String,
    },
}

impl ApiCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiCall::GenerateQr { .. } => Endpoint::GenerateQr,
            ApiCall::Checkin(_) => Endpoint::Checkin,
            ApiCall::PresenceStatus { .. } => Endpoint::PresenceStatus,
            ApiCall::PostGps { .. } => Endpoint::PostGps,
            ApiCall::GpsLatest { .. } => Endpoint::GpsLatest,
            ApiCall::GpsHistory { .. } => Endpoint::GpsHistory,
            ApiCall::PostAccel { .. } => Endpoint::PostAccel,
            ApiCall::AccelLatest { .. } => Endpoint::AccelLatest,
        }
    }
}

struct Script {
    generate_qr: ApiResult<QrTicket>,
    checkin: ApiResult<CheckinResult>,
    presence_status: ApiResult<PresenceStatus>,
    post_gps: ApiResult<()>,
    gps_latest: ApiResult<GpsSample>,
    gps_history: ApiResult<Vec<GpsHistoryPoint>>,
    post_accel: ApiResult<()>,
    accel_latest: ApiResult<AccelLatest>,
}

impl Default for Script {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            generate_qr: Ok(QrTicket {
                qr_token: "mock-qr-token".to_string(),
                expires_at: now + Duration::minutes(5),
            }),
            checkin: Ok(CheckinResult {
                status: "present".to_string(),
                message: "check-in recorded".to_string(),
            }),
            presence_status: Ok(PresenceStatus {
                status: "present".to_string(),
                checked_in_at: Some(now),
            }),
            post_gps: Ok(()),
            gps_latest: Ok(GpsSample {
                lat: -6.3646,
                lng: 106.8287,
                accuracy_m: 12,
                ts: now,
            }),
            gps_history: Ok(vec![
                GpsHistoryPoint {
                    lat: -6.3650,
                    lng: 106.8280,
                    ts: now - Duration::minutes(2),
                },
                GpsHistoryPoint {
                    lat: -6.3646,
                    lng: 106.8287,
                    ts: now,
                },
            ]),
            post_accel: Ok(()),
            accel_latest: Ok(AccelLatest {
                x: 0.02,
                y: 0.11,
                z: 9.79,
                ts: now,
            }),
        }
    }
}

/// A [`PresenceApi`] with scripted answers.
#[derive(Default)]
pub struct MockPresenceApi {
    script: Mutex<Script>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockPresenceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`fail`](Self::fail).
    pub fn failing(self, endpoint: Endpoint, failure: ApiFailure) -> Self {
        self.fail(endpoint, failure);
        self
    }

    /// Makes every later call to `endpoint` return `failure`.
    pub fn fail(&self, endpoint: Endpoint, failure: ApiFailure) {
        let mut script = lock(&self.script);
        match endpoint {
            Endpoint::GenerateQr => script.generate_qr = Err(failure),
            Endpoint::Checkin => script.checkin = Err(failure),
            Endpoint::PresenceStatus => script.presence_status = Err(failure),
            Endpoint::PostGps => script.post_gps = Err(failure),
            Endpoint::GpsLatest => script.gps_latest = Err(failure),
            Endpoint::GpsHistory => script.gps_history = Err(failure),
            Endpoint::PostAccel => script.post_accel = Err(failure),
            Endpoint::AccelLatest => script.accel_latest = Err(failure),
        }
    }

    pub fn set_qr_ticket(&self, ticket: QrTicket) {
        lock(&self.script).generate_qr = Ok(ticket);
    }

    pub fn set_checkin(&self, result: CheckinResult) {
        lock(&self.script).checkin = Ok(result);
    }

    pub fn set_presence_status(&self, status: PresenceStatus) {
        lock(&self.script).presence_status = Ok(status);
    }

    pub fn set_gps_latest(&self, sample: GpsSample) {
        lock(&self.script).gps_latest = Ok(sample);
    }

    pub fn set_gps_history(&self, history: Vec<GpsHistoryPoint>) {
        lock(&self.script).gps_history = Ok(history);
    }

    pub fn set_accel_latest(&self, latest: AccelLatest) {
        lock(&self.script).accel_latest = Ok(latest);
    }

    /// Every call so far, in arrival order.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<ApiCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .cloned()
            .collect()
    }

    pub fn was_called(&self, endpoint: Endpoint) -> bool {
        lock(&self.calls).iter().any(|c| c.endpoint() == endpoint)
    }

    /// Position of the first call to `endpoint`.
    pub fn first_index_of(&self, endpoint: Endpoint) -> Option<usize> {
        lock(&self.calls).iter().position(|c| c.endpoint() == endpoint)
    }

    fn record(&self, call: ApiCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl PresenceApi for MockPresenceApi {
    async fn generate_qr(&self, course_id: &str, session_id: &str) -> ApiResult<QrTicket> {
        self.record(ApiCall::GenerateQr {
            course_id: course_id.to_string(),
            session_id: session_id.to_string(),
        });
        lock(&self.script).generate_qr.clone()
    }

    async fn checkin(&self, request: &CheckinRequest) -> ApiResult<CheckinResult> {
        self.record(ApiCall::Checkin(request.clone()));
        lock(&self.script).checkin.clone()
    }

    async fn presence_status(
        &self,
        user_id: &str,
        course_id: &str,
        session_id: &str,
    ) -> ApiResult<PresenceStatus> {
        self.record(ApiCall::PresenceStatus {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            session_id: session_id.to_string(),
        });
        lock(&self.script).presence_status.clone()
    }

    async fn post_gps(&self, device_id: &str, sample: &GpsSample) -> ApiResult<()> {
        self.record(ApiCall::PostGps {
            device_id: device_id.to_string(),
            sample: sample.clone(),
        });
        lock(&self.script).post_gps.clone()
    }

    async fn gps_latest(&self, device_id: &str) -> ApiResult<GpsSample> {
        self.record(ApiCall::GpsLatest {
            device_id: device_id.to_string(),
        });
        lock(&self.script).gps_latest.clone()
    }

    async fn gps_history(
        &self,
        device_id: &str,
        limit: Option<u32>,
    ) -> ApiResult<Vec<GpsHistoryPoint>> {
        self.record(ApiCall::GpsHistory {
            device_id: device_id.to_string(),
            limit,
        });
        lock(&self.script).gps_history.clone()
    }

    async fn post_accel(&self, device_id: &str, samples: &[AccelSample]) -> ApiResult<()> {
        self.record(ApiCall::PostAccel {
            device_id: device_id.to_string(),
            samples: samples.to_vec(),
        });
        lock(&self.script).post_accel.clone()
    }

    async fn accel_latest(&self, device_id: &str) -> ApiResult<AccelLatest> {
        self.record(ApiCall::AccelLatest {
            device_id: device_id.to_string(),
        });
        lock(&self.script).accel_latest.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_scripted_failures() {
        let api = MockPresenceApi::new().failing(Endpoint::Checkin, ApiFailure::rejected("closed"));

        assert!(api.gps_latest("dev-1").await.is_ok());
        let err = api
            .checkin(&CheckinRequest {
                user_id: "u".into(),
                device_id: "dev-1".into(),
                course_id: "c".into(),
                session_id: "s".into(),
                qr_token: "t".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.message, "closed");
        assert_eq!(api.calls().len(), 2);
        assert_eq!(api.first_index_of(Endpoint::Checkin), Some(1));
        assert!(!api.was_called(Endpoint::PostGps));
    }
}
