// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PresenceConfig {
    /// Remote service endpoint and logging.
    #[serde(default)]
    pub client: ClientConfig,

    /// Check-in pipeline tuning.
    #[serde(default)]
    pub checkin: CheckinConfig,

    /// Local identifier storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Fixed device position for hosts without a geolocation capability.
    #[serde(default)]
    pub device: DeviceConfig,
}

/// Remote service client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the attendance/telemetry service, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            log_level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Check-in pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CheckinConfig {
    /// Length of the accelerometer capture window in milliseconds.
    #[serde(default = "default_motion_window_ms")]
    pub motion_window_ms: u64,

    /// Upper bound on a single location read in milliseconds.
    #[serde(default = "default_location_timeout_ms")]
    pub location_timeout_ms: u64,

    /// Number of history points to request after a check-in.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Request a high-accuracy location fix.
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
}

impl CheckinConfig {
    pub fn motion_window(&self) -> Duration {
        Duration::from_millis(self.motion_window_ms)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            motion_window_ms: default_motion_window_ms(),
            location_timeout_ms: default_location_timeout_ms(),
            history_limit: default_history_limit(),
            high_accuracy: default_high_accuracy(),
        }
    }
}

fn default_motion_window_ms() -> u64 {
    3000
}

fn default_location_timeout_ms() -> u64 {
    10_000
}

fn default_history_limit() -> u32 {
    200
}

fn default_high_accuracy() -> bool {
    true
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite file holding `device_id` and `user_id`.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("presence").join("presence.db"))
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "presence.db".to_string())
}

/// Fixed device coordinates.
///
/// Leave `latitude`/`longitude` unset to report no geolocation capability,
/// which makes every check-in attempt abort at the location step.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Reported accuracy radius in metres.
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl DeviceConfig {
    /// Returns `(latitude, longitude, accuracy)` when a position is configured.
    pub fn fixed_position(&self) -> Option<(f64, f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng, self.accuracy_m.unwrap_or(10.0))),
            _ => None,
        }
    }
}
