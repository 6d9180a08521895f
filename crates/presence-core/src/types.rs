// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Check-in data model shared by every crate in the workspace.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::time::{iso8601, iso8601_opt};

/// Per-device identifier. Generated once, persisted locally, never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
}

/// Session identity extracted from a scanned QR payload.
///
/// `raw_token` is always the scanned payload, byte for byte, because it is
/// the credential submitted with the check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSession {
    pub course_id: String,
    pub session_id: String,
    pub raw_token: String,
}

/// A single location fix, either read on the device or reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsSample {
    pub lat: f64,
    pub lng: f64,
    #[serde(deserialize_with = "whole_metres")]
    pub accuracy_m: u32,
    #[serde(with = "iso8601")]
    pub ts: DateTime<Utc>,
}

/// Accuracy arrives as any JSON number; it is kept rounded to the metre.
fn whole_metres<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let metres = f64::deserialize(deserializer)?;
    if !metres.is_finite() || metres < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "accuracy must be a non-negative number, got {metres}"
        )));
    }
    Ok(metres.round().min(f64::from(u32::MAX)) as u32)
}

/// One point of the device's location trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsHistoryPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(with = "iso8601")]
    pub ts: DateTime<Utc>,
}

/// One accelerometer reading inside a capture window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    #[serde(with = "iso8601")]
    pub t: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Most recent accelerometer reading as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelLatest {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(with = "iso8601")]
    pub ts: DateTime<Utc>,
}

/// Check-in claim. The submission timestamp is attached by the client at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRequest {
    pub user_id: String,
    pub device_id: String,
    pub course_id: String,
    pub session_id: String,
    pub qr_token: String,
}

/// Service verdict on a check-in. `status` is an open, server-defined label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinResult {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Attendance status of a user for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceStatus {
    pub status: String,
    #[serde(default, with = "iso8601_opt", skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// A QR token issued for a course session (lecturer side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrTicket {
    pub qr_token: String,
    #[serde(with = "iso8601")]
    pub expires_at: DateTime<Utc>,
}

/// Coarse classification of an attendance status label for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusBadge {
    Present,
    Failed,
    Pending,
    /// Unrecognized label, shown verbatim.
    Other(String),
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusBadge::Present => write!(f, "present"),
            StatusBadge::Failed => write!(f, "failed"),
            StatusBadge::Pending => write!(f, "pending"),
            StatusBadge::Other(label) => write!(f, "{label}"),
        }
    }
}

impl StatusBadge {
    /// Classifies a free-form status label. Matching is case-insensitive and
    /// substring based; English and Indonesian labels are recognized.
    pub fn classify(status: &str) -> Self {
        let normalized = status.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| normalized.contains(n));

        if has(&["success", "hadir", "present"]) {
            StatusBadge::Present
        } else if has(&["fail", "absent", "gagal"]) {
            StatusBadge::Failed
        } else if has(&["pending", "waiting"]) {
            StatusBadge::Pending
        } else {
            StatusBadge::Other(status.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_classification() {
        assert_eq!(StatusBadge::classify("SUCCESS"), StatusBadge::Present);
        assert_eq!(StatusBadge::classify("hadir"), StatusBadge::Present);
        assert_eq!(StatusBadge::classify("check-in failed"), StatusBadge::Failed);
        assert_eq!(StatusBadge::classify("Absent"), StatusBadge::Failed);
        assert_eq!(StatusBadge::classify("waiting_review"), StatusBadge::Pending);
        assert_eq!(
            StatusBadge::classify("late"),
            StatusBadge::Other("late".into())
        );
        assert_eq!(StatusBadge::classify("late").to_string(), "late");
    }

    #[test]
    fn presence_status_without_checkin_time() {
        let status: PresenceStatus = serde_json::from_str(r#"{"status":"absent"}"#).unwrap();
        assert_eq!(status.status, "absent");
        assert!(status.checked_in_at.is_none());

        let status: PresenceStatus = serde_json::from_str(
            r#"{"status":"present","checked_in_at":"2026-03-02T08:15:30.000Z"}"#,
        )
        .unwrap();
        assert!(status.checked_in_at.is_some());
    }

    #[test]
    fn presence_status_accepts_offsetless_checkin_time() {
        let status: PresenceStatus = serde_json::from_str(
            r#"{"status":"hadir","checked_in_at":"2026-03-02T08:15:30"}"#,
        )
        .unwrap();
        let expected = chrono::TimeZone::with_ymd_and_hms(&Utc, 2026, 3, 2, 8, 15, 30).unwrap();
        assert_eq!(status.checked_in_at, Some(expected));
    }

    #[test]
    fn gps_accuracy_accepts_fractional_metres() {
        let sample: GpsSample = serde_json::from_str(
            r#"{"lat":-6.2,"lng":106.8,"accuracy_m":12.0,"ts":"2026-03-02T08:15:30Z"}"#,
        )
        .unwrap();
        assert_eq!(sample.accuracy_m, 12);

        let sample: GpsSample = serde_json::from_str(
            r#"{"lat":-6.2,"lng":106.8,"accuracy_m":12.6,"ts":"2026-03-02T08:15:30"}"#,
        )
        .unwrap();
        assert_eq!(sample.accuracy_m, 13);

        let sample: GpsSample = serde_json::from_str(
            r#"{"lat":-6.2,"lng":106.8,"accuracy_m":8,"ts":"2026-03-02T08:15:30Z"}"#,
        )
        .unwrap();
        assert_eq!(sample.accuracy_m, 8);
        assert_eq!(serde_json::to_value(&sample).unwrap()["accuracy_m"], 8);
    }

    #[test]
    fn gps_accuracy_rejects_negative_values() {
        let result = serde_json::from_str::<GpsSample>(
            r#"{"lat":0.0,"lng":0.0,"accuracy_m":-3,"ts":"2026-03-02T08:15:30Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn accel_sample_serializes_iso_t() {
        let sample: AccelSample = serde_json::from_str(
            r#"{"t":"2026-03-02T08:15:30.250Z","x":0.1,"y":0.2,"z":9.81}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["t"], "2026-03-02T08:15:30.250Z");
        assert_eq!(json["z"], 9.81);
    }
}
