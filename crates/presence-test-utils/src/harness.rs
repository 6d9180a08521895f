// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end harness for the check-in orchestrator.
//!
//! `TestHarness` wires a [`CheckinOrchestrator`] to an in-memory identity
//! store and the mock adapters in this crate. `scan()` drives a full
//! toggle → scan → attempt cycle.

use std::sync::Arc;

use presence_checkin::{CheckinOrchestrator, CheckinSettings, ScanDisposition};
use presence_core::{LocationSource, MotionSource, PresenceError};
use presence_sensors::{LocationCollector, MotionCollector};
use presence_storage::{DEVICE_ID_KEY, IdentityStore, MemoryKvStore};

use crate::mock_api::MockPresenceApi;
use crate::mock_scanner::MockScanner;
use crate::mock_sensors::{MockLocationSource, ScriptedMotionSource};

/// Builder for [`TestHarness`]. Defaults: a healthy API, a good GPS fix, a
/// motion sensor with three events, no stored user id.
pub struct TestHarnessBuilder {
    api: MockPresenceApi,
    location: Option<MockLocationSource>,
    motion: Option<ScriptedMotionSource>,
    user_id: Option<String>,
    device_id: Option<String>,
    settings: CheckinSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            api: MockPresenceApi::new(),
            location: Some(MockLocationSource::fix(-6.3647, 106.8286, 8.4)),
            motion: Some(ScriptedMotionSource::from_readings(&[
                (0.012, 0.104, 9.801),
                (0.015, 0.099, 9.797),
                (0.011, 0.101, 9.806),
            ])),
            user_id: None,
            device_id: None,
            settings: CheckinSettings::default(),
        }
    }

    pub fn with_api(mut self, api: MockPresenceApi) -> Self {
        self.api = api;
        self
    }

    pub fn with_location(mut self, source: MockLocationSource) -> Self {
        self.location = Some(source);
        self
    }

    /// The device has no geolocation capability at all.
    pub fn without_geolocation(mut self) -> Self {
        self.location = None;
        self
    }

    pub fn with_motion(mut self, source: ScriptedMotionSource) -> Self {
        self.motion = Some(source);
        self
    }

    /// The device has no motion-event capability at all.
    pub fn without_motion(mut self) -> Self {
        self.motion = None;
        self
    }

    /// Pre-stores a user id, skipping the identity prompt.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_settings(mut self, settings: CheckinSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn build(self) -> Result<TestHarness, PresenceError> {
        let store = Arc::new(match self.device_id {
            Some(device_id) => MemoryKvStore::with_entries([(DEVICE_ID_KEY, device_id)]),
            None => MemoryKvStore::new(),
        });
        let identity = IdentityStore::new(store.clone());
        if let Some(user_id) = &self.user_id {
            identity.set_user_id(user_id).await?;
        }

        let api = Arc::new(self.api);
        let location = self.location.map(Arc::new);
        let motion = self.motion.map(Arc::new);

        let orchestrator = CheckinOrchestrator::new(
            identity.clone(),
            api.clone(),
            LocationCollector::new(
                location
                    .clone()
                    .map(|source| source as Arc<dyn LocationSource>),
            ),
            MotionCollector::new(motion.clone().map(|source| source as Arc<dyn MotionSource>)),
            self.settings,
        );

        Ok(TestHarness {
            orchestrator,
            api,
            identity,
            store,
            location,
            motion,
        })
    }
}

/// A wired orchestrator plus handles to every mock behind it.
pub struct TestHarness {
    pub orchestrator: CheckinOrchestrator,
    pub api: Arc<MockPresenceApi>,
    pub identity: IdentityStore,
    pub store: Arc<MemoryKvStore>,
    pub location: Option<Arc<MockLocationSource>>,
    pub motion: Option<Arc<ScriptedMotionSource>>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Opens the scanner, scans `raw_token`, and hands it to the orchestrator.
    pub async fn scan(&mut self, raw_token: &str) -> Result<ScanDisposition, PresenceError> {
        let scanner = Arc::new(MockScanner::with_payloads([raw_token]));
        let session = self
            .orchestrator
            .toggle_scanner(scanner)
            .ok_or_else(|| PresenceError::Internal("scanner could not be opened".to_string()))?;
        self.orchestrator.scan_once(&session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_checkin::Phase;

    #[tokio::test(start_paused = true)]
    async fn harness_runs_a_full_attempt() {
        let mut harness = TestHarness::builder()
            .with_user_id("mhs001")
            .with_device_id("dev-fixed")
            .build()
            .await
            .unwrap();

        let disposition = harness.scan("CC101|S01").await.unwrap();

        assert_eq!(disposition, ScanDisposition::Started);
        assert_eq!(harness.orchestrator.phase(), Phase::Done);
        assert!(harness.orchestrator.state().error.is_none());
        assert_eq!(harness.api.calls().len(), 7);
    }
}
