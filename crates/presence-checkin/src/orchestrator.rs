// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Check-in orchestrator.
//!
//! Drives one attempt from scanned token to reconciled view:
//!
//! 1. device id and session resolution
//! 2. location read (fatal on failure) and GPS telemetry (best effort)
//! 3. motion window and accelerometer telemetry (best effort)
//! 4. check-in submission (best effort)
//! 5. status, latest readings and history, fetched concurrently (best effort)
//! 6. `done`
//!
//! A hard error in steps 1-5 skips the remaining steps, is recorded in
//! [`OrchestrationState::error`], and still ends the attempt in `done`.
//! Soft API failures are logged and the attempt moves on.

use std::sync::Arc;
use std::time::Duration;

use presence_config::model::CheckinConfig;
use presence_core::traits::api::DEFAULT_HISTORY_LIMIT;
use presence_core::{CheckinRequest, PresenceApi, PresenceError, QrScanner};
use presence_sensors::{LocationCollector, MotionCollector};
use presence_storage::IdentityStore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::scan::ScanSession;
use crate::token::TokenResolver;
use crate::view::{ConsolidatedView, OrchestrationState, Phase, Snapshot};

/// Characters of the scanned token echoed to the activity log.
const TOKEN_PREVIEW_CHARS: usize = 20;

/// Tunables for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinSettings {
    pub motion_window: Duration,
    pub location_timeout: Duration,
    pub history_limit: u32,
}

impl Default for CheckinSettings {
    fn default() -> Self {
        Self {
            motion_window: Duration::from_millis(3000),
            location_timeout: Duration::from_secs(10),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl CheckinSettings {
    pub fn from_config(config: &CheckinConfig) -> Self {
        Self {
            motion_window: config.motion_window(),
            location_timeout: config.location_timeout(),
            history_limit: config.history_limit,
        }
    }
}

/// What happened to a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDisposition {
    /// An attempt ran to completion. Its outcome is in the orchestrator state.
    Started,
    /// No user id is stored; the token is held until [`CheckinOrchestrator::provide_user_id`].
    AwaitingIdentity,
    /// The orchestrator was not expecting a token.
    Ignored,
}

/// Owns the check-in state machine and the consolidated view.
pub struct CheckinOrchestrator {
    identity: IdentityStore,
    api: Arc<dyn PresenceApi>,
    location: LocationCollector,
    motion: MotionCollector,
    resolver: TokenResolver,
    settings: CheckinSettings,
    state: OrchestrationState,
    view: ConsolidatedView,
    snapshots: watch::Sender<Snapshot>,
    scan: Option<ScanSession>,
    pending_token: Option<String>,
}

impl CheckinOrchestrator {
    pub fn new(
        identity: IdentityStore,
        api: Arc<dyn PresenceApi>,
        location: LocationCollector,
        motion: MotionCollector,
        settings: CheckinSettings,
    ) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::default());
        Self {
            identity,
            api,
            location,
            motion,
            resolver: TokenResolver::new(),
            settings,
            state: OrchestrationState::default(),
            view: ConsolidatedView::default(),
            snapshots,
            scan: None,
            pending_token: None,
        }
    }

    /// Receives a snapshot each time a step settles.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> &OrchestrationState {
        &self.state
    }

    pub fn view(&self) -> &ConsolidatedView {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn settings(&self) -> &CheckinSettings {
        &self.settings
    }

    /// True while a scanned token waits for the user to enter an id.
    pub fn awaiting_identity(&self) -> bool {
        self.pending_token.is_some()
    }

    /// Starts or stops scanning.
    ///
    /// From `idle`/`done` this opens a [`ScanSession`] and returns it. From
    /// `scanning` it cancels the open session immediately. While an attempt is
    /// processing the toggle is ignored; a started pipeline always runs to the end.
    pub fn toggle_scanner(&mut self, scanner: Arc<dyn QrScanner>) -> Option<ScanSession> {
        match self.state.phase {
            Phase::Idle | Phase::Done => {
                let session = ScanSession::new(scanner);
                self.scan = Some(session.clone());
                self.state.phase = Phase::Scanning;
                self.publish();
                Some(session)
            }
            Phase::Scanning => {
                self.stop_scan();
                self.state.phase = Phase::Idle;
                self.publish();
                None
            }
            Phase::Processing => {
                debug!("scanner toggle ignored while processing");
                None
            }
        }
    }

    /// Waits on `session` and feeds the payload to [`on_scan`](Self::on_scan).
    ///
    /// A cancelled session returns the orchestrator to `idle`.
    pub async fn scan_once(
        &mut self,
        session: &ScanSession,
    ) -> Result<ScanDisposition, PresenceError> {
        match session.next_token().await? {
            Some(raw_token) => self.on_scan(raw_token).await,
            None => {
                if self.state.phase == Phase::Scanning {
                    self.scan = None;
                    self.state.phase = Phase::Idle;
                    self.publish();
                }
                Ok(ScanDisposition::Ignored)
            }
        }
    }

    /// Handles a decoded QR payload.
    ///
    /// Only accepted while scanning. Stops the scanner, then either runs the
    /// attempt or, when no user id is stored, suspends until one is provided.
    ///
    /// A failed user id read ends the attempt in `done` with the error
    /// recorded, and is returned to the caller.
    pub async fn on_scan(
        &mut self,
        raw_token: String,
    ) -> Result<ScanDisposition, PresenceError> {
        if self.state.phase != Phase::Scanning {
            debug!(phase = %self.state.phase, "scan ignored");
            return Ok(ScanDisposition::Ignored);
        }

        self.stop_scan();
        self.state.phase = Phase::Processing;
        let preview: String = raw_token.chars().take(TOKEN_PREVIEW_CHARS).collect();
        self.log(format!("QR scanned: {preview}..."));
        self.view.qr_token = Some(raw_token.clone());
        self.publish();

        match self.identity.user_id().await {
            Ok(user_id) if !user_id.is_empty() => {
                self.run_pipeline(raw_token, user_id).await;
                Ok(ScanDisposition::Started)
            }
            Ok(_) => {
                self.pending_token = Some(raw_token);
                self.log("User ID required before check-in");
                self.publish();
                Ok(ScanDisposition::AwaitingIdentity)
            }
            Err(err) => {
                self.finish_with_error(&err);
                Err(err)
            }
        }
    }

    /// Stores the user id and resumes the suspended attempt with the same token.
    ///
    /// A blank id is rejected and the token stays pending.
    pub async fn provide_user_id(
        &mut self,
        user_id: &str,
    ) -> Result<ScanDisposition, PresenceError> {
        if self.pending_token.is_none() {
            return Ok(ScanDisposition::Ignored);
        }

        self.identity.set_user_id(user_id).await?;
        let user_id = user_id.trim().to_string();
        self.log(format!("User ID saved: {user_id}"));

        match self.pending_token.take() {
            Some(raw_token) => {
                self.run_pipeline(raw_token, user_id).await;
                Ok(ScanDisposition::Started)
            }
            None => Ok(ScanDisposition::Ignored),
        }
    }

    /// Runs steps 1-6 for `raw_token`. Always ends in `done`.
    pub async fn run_pipeline(&mut self, raw_token: String, user_id: String) {
        self.stop_scan();
        self.state.phase = Phase::Processing;
        self.state.error = None;
        self.view.begin_attempt(&raw_token);
        self.publish();

        match self.execute(&raw_token, &user_id).await {
            Ok(()) => {
                self.log("Check-in flow complete.");
                self.state.phase = Phase::Done;
                self.publish();
            }
            Err(err) => self.finish_with_error(&err),
        }
    }

    async fn execute(&mut self, raw_token: &str, user_id: &str) -> Result<(), PresenceError> {
        // 1. identity and session
        let device_id = self.identity.get_or_create_device_id().await?.device_id;
        let session = self.resolver.resolve(raw_token);
        info!(
            %device_id,
            course_id = %session.course_id,
            session_id = %session.session_id,
            "check-in attempt started"
        );
        self.view.session = Some(session.clone());
        self.publish();

        // 2. location
        self.log("Acquiring GPS location...");
        let gps = self.location.read(self.settings.location_timeout).await?;
        self.log(format!(
            "GPS fix: {:.6}, {:.6} (±{} m)",
            gps.lat, gps.lng, gps.accuracy_m
        ));
        let submitted = self.api.post_gps(&device_id, &gps).await;
        self.view.device_gps = Some(gps);
        match submitted {
            Ok(()) => self.log("GPS submitted."),
            Err(failure) => {
                warn!(step = "gps", error = %failure, "telemetry submission failed");
                self.log(format!("GPS submit error: {failure}"));
            }
        }
        self.publish();

        // 3. motion
        self.log(format!(
            "Collecting accelerometer data ({} ms)...",
            self.settings.motion_window.as_millis()
        ));
        let samples = self.motion.collect(self.settings.motion_window).await;
        let submitted = self.api.post_accel(&device_id, &samples).await;
        let count = samples.len();
        self.view.accel_samples = samples;
        match submitted {
            Ok(()) => self.log(format!("Accelerometer batch submitted ({count} samples).")),
            Err(failure) => {
                warn!(step = "accel", error = %failure, "telemetry submission failed");
                self.log(format!("Accel submit error: {failure}"));
            }
        }
        self.publish();

        // 4. check-in
        self.log("Submitting check-in...");
        let request = CheckinRequest {
            user_id: user_id.to_string(),
            device_id: device_id.clone(),
            course_id: session.course_id.clone(),
            session_id: session.session_id.clone(),
            qr_token: raw_token.to_string(),
        };
        match self.api.checkin(&request).await {
            Ok(result) => {
                self.log(format!("Check-in: {} - {}", result.status, result.message));
                self.view.checkin = Some(result);
            }
            Err(failure) => {
                warn!(step = "checkin", error = %failure, "check-in submission failed");
                self.log(format!("Check-in error: {failure}"));
            }
        }
        self.publish();

        // 5. reconciliation
        self.log("Loading status data...");
        let api = &self.api;
        let (status, accel_latest, gps_latest, gps_history) = tokio::join!(
            api.presence_status(user_id, &session.course_id, &session.session_id),
            api.accel_latest(&device_id),
            api.gps_latest(&device_id),
            api.gps_history(&device_id, Some(self.settings.history_limit)),
        );

        match status {
            Ok(status) => self.view.status = Some(status),
            Err(failure) => self.log(format!("Status fetch error: {failure}")),
        }
        match accel_latest {
            Ok(latest) => self.view.accel_latest = Some(latest),
            Err(failure) => self.log(format!("Accel latest fetch error: {failure}")),
        }
        match gps_latest {
            Ok(latest) => self.view.gps_latest = Some(latest),
            Err(failure) => self.log(format!("GPS latest fetch error: {failure}")),
        }
        match gps_history {
            Ok(history) => self.view.gps_history = history,
            Err(failure) => self.log(format!("GPS history fetch error: {failure}")),
        }
        self.publish();

        Ok(())
    }

    fn finish_with_error(&mut self, err: &PresenceError) {
        warn!(error = %err, fatal = err.is_fatal(), "check-in attempt aborted");
        let message = err.to_string();
        self.log(format!("Error: {message}"));
        self.state.error = Some(message);
        self.state.phase = Phase::Done;
        self.publish();
    }

    fn stop_scan(&mut self) {
        if let Some(scan) = self.scan.take() {
            scan.cancel();
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let entry = self.state.log.push(message);
        info!(target: "presence::activity", "{}", entry.message);
    }

    fn publish(&self) {
        self.snapshots.send_replace(Snapshot {
            state: self.state.clone(),
            view: self.view.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let config = CheckinConfig {
            motion_window_ms: 1500,
            location_timeout_ms: 4000,
            history_limit: 50,
            high_accuracy: false,
        };
        let settings = CheckinSettings::from_config(&config);
        assert_eq!(settings.motion_window, Duration::from_millis(1500));
        assert_eq!(settings.location_timeout, Duration::from_secs(4));
        assert_eq!(settings.history_limit, 50);
    }

    #[test]
    fn default_settings() {
        let settings = CheckinSettings::default();
        assert_eq!(settings.motion_window, Duration::from_millis(3000));
        assert_eq!(settings.location_timeout, Duration::from_secs(10));
        assert_eq!(settings.history_limit, 200);
    }
}
