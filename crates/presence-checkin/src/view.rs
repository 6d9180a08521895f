// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestrator state as seen by a presentation layer.

use std::fmt;

use chrono::{DateTime, Local};
use presence_core::{
    AccelLatest, AccelSample, CheckinResult, GpsHistoryPoint, GpsSample, PresenceStatus,
    ResolvedSession,
};

/// Check-in phase.
///
/// `Scanning`, `Processing` and `Done` are mutually exclusive. `Processing`
/// covers the identity prompt as well as the running pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Scanning,
    Processing,
    Done,
}

/// One activity-log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Append-only, timestamped activity log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, message: impl Into<String>) -> &LogEntry {
        self.entries.push(LogEntry {
            at: Local::now(),
            message: message.into(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

/// Phase, activity log and last fatal error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationState {
    pub phase: Phase,
    pub log: ActivityLog,
    pub error: Option<String>,
}

/// Everything the orchestrator has gathered for display.
///
/// Per-attempt fields are cleared when an attempt starts. Remote-backed fields
/// (`status`, `accel_latest`, `gps_latest`, `gps_history`) only change when
/// their own fetch succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedView {
    pub qr_token: Option<String>,
    pub session: Option<ResolvedSession>,
    pub device_gps: Option<GpsSample>,
    pub accel_samples: Vec<AccelSample>,
    pub checkin: Option<CheckinResult>,

    pub status: Option<PresenceStatus>,
    pub accel_latest: Option<AccelLatest>,
    pub gps_latest: Option<GpsSample>,
    pub gps_history: Vec<GpsHistoryPoint>,
}

impl ConsolidatedView {
    pub(crate) fn begin_attempt(&mut self, raw_token: &str) {
        self.qr_token = Some(raw_token.to_string());
        self.session = None;
        self.device_gps = None;
        self.accel_samples.clear();
        self.checkin = None;
    }

    /// The location to show: the newer of the remote latest and this
    /// attempt's device read. Equal timestamps favour the remote reading.
    pub fn display_gps(&self) -> Option<&GpsSample> {
        match (&self.gps_latest, &self.device_gps) {
            (Some(remote), Some(device)) if device.ts > remote.ts => Some(device),
            (Some(remote), _) => Some(remote),
            (None, device) => device.as_ref(),
        }
    }
}

/// What a presentation layer observes after each step settles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub state: OrchestrationState,
    pub view: ConsolidatedView,
}
