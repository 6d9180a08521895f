// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end check-in scenarios against mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use async_trait::async_trait;
use presence_checkin::{CheckinOrchestrator, CheckinSettings, Phase, ScanDisposition};
use presence_core::{
    AccelLatest, ApiFailure, CheckinResult, GpsHistoryPoint, GpsSample, PresenceError,
    PresenceStatus, ResolvedSession,
};
use presence_sensors::{LocationCollector, MotionCollector};
use presence_storage::{IdentityStore, USER_ID_KEY};
use presence_core::KeyValueStore;
use presence_test_utils::{
    ApiCall, Endpoint, MockLocationSource, MockPresenceApi, MockScanner, ScriptedMotionSource,
    TestHarness,
};

#[tokio::test(start_paused = true)]
async fn missing_user_id_suspends_then_resumes_with_same_token() {
    let mut harness = TestHarness::builder().build().await.unwrap();

    let disposition = harness.scan("CC101|S01").await.unwrap();
    assert_eq!(disposition, ScanDisposition::AwaitingIdentity);
    assert!(harness.orchestrator.awaiting_identity());
    assert_eq!(harness.orchestrator.phase(), Phase::Processing);
    assert!(harness.api.calls().is_empty());

    let resumed = harness.orchestrator.provide_user_id("mhs001").await.unwrap();
    assert_eq!(resumed, ScanDisposition::Started);
    assert_eq!(harness.orchestrator.phase(), Phase::Done);
    assert!(!harness.orchestrator.awaiting_identity());

    assert_eq!(
        harness.orchestrator.view().session,
        Some(ResolvedSession {
            course_id: "CC101".into(),
            session_id: "S01".into(),
            raw_token: "CC101|S01".into(),
        })
    );
    assert_eq!(
        harness.store.get(USER_ID_KEY).await.unwrap().as_deref(),
        Some("mhs001")
    );

    let checkins = harness.api.calls_to(Endpoint::Checkin);
    let [ApiCall::Checkin(request)] = checkins.as_slice() else {
        panic!("expected exactly one check-in, got {checkins:?}");
    };
    assert_eq!(request.user_id, "mhs001");
    assert_eq!(request.qr_token, "CC101|S01");
    assert_eq!(request.course_id, "CC101");
    assert_eq!(request.session_id, "S01");
    assert!(!request.device_id.is_empty());
}

#[tokio::test(start_paused = true)]
async fn blank_user_id_keeps_token_pending() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    harness.scan("CC101|S01").await.unwrap();

    assert!(harness.orchestrator.provide_user_id("   ").await.is_err());
    assert!(harness.orchestrator.awaiting_identity());
    assert!(harness.api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn steps_run_in_order_with_one_device_id() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    let post_gps = harness.api.first_index_of(Endpoint::PostGps).unwrap();
    let post_accel = harness.api.first_index_of(Endpoint::PostAccel).unwrap();
    let checkin = harness.api.first_index_of(Endpoint::Checkin).unwrap();
    assert!(post_gps < post_accel && post_accel < checkin);
    for fetch in Endpoint::FETCHES {
        assert!(harness.api.first_index_of(fetch).unwrap() > checkin);
    }

    let device_id = harness.identity.get_or_create_device_id().await.unwrap().device_id;
    for call in harness.api.calls() {
        match call {
            ApiCall::PostGps { device_id: d, .. }
            | ApiCall::PostAccel { device_id: d, .. }
            | ApiCall::GpsLatest { device_id: d }
            | ApiCall::AccelLatest { device_id: d } => assert_eq!(d, device_id),
            ApiCall::GpsHistory { device_id: d, limit } => {
                assert_eq!(d, device_id);
                assert_eq!(limit, Some(200));
            }
            ApiCall::Checkin(request) => assert_eq!(request.device_id, device_id),
            ApiCall::PresenceStatus { user_id, .. } => assert_eq!(user_id, "mhs001"),
            ApiCall::GenerateQr { .. } => panic!("student flow never generates QR codes"),
        }
    }

    let log = &harness.orchestrator.state().log;
    assert!(log.entries()[0].message.starts_with("QR scanned: CC101|S01..."));
    assert!(log.contains("Check-in: present - check-in recorded"));
}

#[tokio::test(start_paused = true)]
async fn scan_log_shows_twenty_character_preview() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .build()
        .await
        .unwrap();
    let token = "https://campus.example/att?course_id=MA101&session_id=W3";
    harness.scan(token).await.unwrap();

    let first = &harness.orchestrator.state().log.entries()[0];
    assert_eq!(first.message, "QR scanned: https://campus.examp...");
    assert_eq!(harness.orchestrator.view().qr_token.as_deref(), Some(token));
}

#[tokio::test(start_paused = true)]
async fn no_motion_capability_submits_ten_synthetic_samples() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .without_motion()
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    let samples = &harness.orchestrator.view().accel_samples;
    assert_eq!(samples.len(), 10);
    for s in samples {
        assert!((0.0..=0.5).contains(&s.x));
        assert!((0.0..=0.5).contains(&s.y));
        assert!((9.7..=10.0).contains(&s.z));
    }

    let posted = harness.api.calls_to(Endpoint::PostAccel);
    let [ApiCall::PostAccel { samples: sent, .. }] = posted.as_slice() else {
        panic!("expected one accelerometer submission");
    };
    assert_eq!(sent, samples);
}

#[tokio::test(start_paused = true)]
async fn silent_motion_sensor_submits_resting_sample() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_motion(ScriptedMotionSource::silent())
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    let samples = &harness.orchestrator.view().accel_samples;
    assert_eq!(samples.len(), 1);
    assert_eq!((samples[0].x, samples[0].y, samples[0].z), (0.0, 0.0, 9.8));
    assert!(harness.motion.as_ref().unwrap().all_stopped());
}

#[tokio::test(start_paused = true)]
async fn denied_geolocation_aborts_before_telemetry() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_location(MockLocationSource::denied("User denied Geolocation"))
        .build()
        .await
        .unwrap();
    let disposition = harness.scan("CC101|S01").await.unwrap();

    assert_eq!(disposition, ScanDisposition::Started);
    let state = harness.orchestrator.state();
    assert_eq!(state.phase, Phase::Done);
    let error = state.error.as_deref().unwrap();
    assert!(error.contains("User denied Geolocation"), "{error}");
    assert!(state.log.contains("Error: GPS error: User denied Geolocation"));

    assert!(harness.api.calls().is_empty());
    assert!(harness.orchestrator.view().accel_samples.is_empty());
    assert_eq!(harness.motion.as_ref().unwrap().subscription_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_geolocation_capability_is_fatal() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .without_geolocation()
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    assert_eq!(harness.orchestrator.phase(), Phase::Done);
    assert!(harness.orchestrator.state().error.is_some());
    assert!(!harness.api.was_called(Endpoint::Checkin));
}

#[tokio::test(start_paused = true)]
async fn stalled_geolocation_times_out() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_location(MockLocationSource::stalled())
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    let error = harness.orchestrator.state().error.clone().unwrap();
    assert!(error.contains("timed out"), "{error}");
    assert!(harness.api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_fetches_leave_previous_values() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();
    let before = harness.orchestrator.view().clone();
    assert!(before.status.is_some());
    assert!(before.gps_latest.is_some());

    for endpoint in Endpoint::FETCHES {
        harness.api.fail(endpoint, ApiFailure::transport("connection refused"));
    }
    harness.scan("CC101|S02").await.unwrap();

    let after = harness.orchestrator.view();
    assert_eq!(after.status, before.status);
    assert_eq!(after.accel_latest, before.accel_latest);
    assert_eq!(after.gps_latest, before.gps_latest);
    assert_eq!(after.gps_history, before.gps_history);
    assert_eq!(after.session.as_ref().unwrap().session_id, "S02");
    assert!(harness.orchestrator.state().error.is_none());
    assert!(harness.orchestrator.state().log.contains("Status fetch error: connection refused"));
}

#[tokio::test(start_paused = true)]
async fn failed_fetches_on_first_attempt_stay_empty() {
    let api = Endpoint::FETCHES.into_iter().fold(MockPresenceApi::new(), |api, e| {
        api.failing(e, ApiFailure::decode("HTTP 502: not an envelope"))
    });
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_api(api)
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    let view = harness.orchestrator.view();
    assert!(view.status.is_none());
    assert!(view.accel_latest.is_none());
    assert!(view.gps_latest.is_none());
    assert!(view.gps_history.is_empty());
    assert_eq!(harness.orchestrator.phase(), Phase::Done);
}

#[tokio::test(start_paused = true)]
async fn telemetry_failure_still_submits_checkin() {
    let api = MockPresenceApi::new()
        .failing(Endpoint::PostGps, ApiFailure::transport("network down"))
        .failing(Endpoint::PostAccel, ApiFailure::rejected("batch too large"));
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_api(api)
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    assert!(harness.api.was_called(Endpoint::Checkin));
    let state = harness.orchestrator.state();
    assert!(state.error.is_none());
    assert!(state.log.contains("GPS submit error: network down"));
    assert!(state.log.contains("Accel submit error: batch too large"));
    assert!(harness.orchestrator.view().device_gps.is_some());
}

#[tokio::test(start_paused = true)]
async fn checkin_failure_still_fetches_status() {
    let api = MockPresenceApi::new().failing(Endpoint::Checkin, ApiFailure::rejected("QR expired"));
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_api(api)
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    for fetch in Endpoint::FETCHES {
        assert!(harness.api.was_called(fetch), "{fetch:?} not fetched");
    }
    assert!(harness.orchestrator.view().checkin.is_none());
    assert!(harness.orchestrator.state().log.contains("Check-in error: QR expired"));
    assert!(harness.orchestrator.state().error.is_none());
}

#[tokio::test(start_paused = true)]
async fn reconciled_view_reflects_remote_data() {
    let api = MockPresenceApi::new();
    let remote_ts = Utc::now() + chrono::Duration::hours(1);
    api.set_checkin(CheckinResult {
        status: "hadir".into(),
        message: "tercatat".into(),
    });
    api.set_presence_status(PresenceStatus {
        status: "hadir".into(),
        checked_in_at: Some(remote_ts),
    });
    api.set_gps_latest(GpsSample {
        lat: 1.5,
        lng: 2.5,
        accuracy_m: 30,
        ts: remote_ts,
    });
    api.set_gps_history(vec![GpsHistoryPoint {
        lat: 1.5,
        lng: 2.5,
        ts: remote_ts,
    }]);
    api.set_accel_latest(AccelLatest {
        x: 0.1,
        y: 0.2,
        z: 9.9,
        ts: remote_ts,
    });

    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_api(api)
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    let view = harness.orchestrator.view();
    assert_eq!(view.checkin.as_ref().unwrap().status, "hadir");
    assert_eq!(view.status.as_ref().unwrap().status, "hadir");
    assert_eq!(view.gps_history.len(), 1);
    assert_eq!(view.accel_latest.as_ref().unwrap().z, 9.9);
    assert_eq!(view.display_gps().unwrap().lat, 1.5);
    assert_eq!(view.device_gps.as_ref().unwrap().accuracy_m, 8);
}

#[tokio::test(start_paused = true)]
async fn toggling_off_cancels_scan_and_returns_to_idle() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .build()
        .await
        .unwrap();
    let scanner = Arc::new(MockScanner::new());

    let session = harness.orchestrator.toggle_scanner(scanner.clone()).unwrap();
    assert_eq!(harness.orchestrator.phase(), Phase::Scanning);

    assert!(harness.orchestrator.toggle_scanner(scanner.clone()).is_none());
    assert_eq!(harness.orchestrator.phase(), Phase::Idle);
    assert!(session.is_cancelled());
    assert_eq!(session.next_token().await.unwrap(), None);

    scanner.push("CC101|S01");
    let disposition = harness.orchestrator.on_scan("CC101|S01".into()).await.unwrap();
    assert_eq!(disposition, ScanDisposition::Ignored);
    assert!(harness.api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn external_cancel_unblocks_scan_once() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .orchestrator
        .toggle_scanner(Arc::new(MockScanner::new()))
        .unwrap();

    let canceller = session.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let disposition = harness.orchestrator.scan_once(&session).await.unwrap();
    assert_eq!(disposition, ScanDisposition::Ignored);
    assert_eq!(harness.orchestrator.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn toggle_is_ignored_while_awaiting_identity() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    harness.scan("CC101|S01").await.unwrap();

    assert!(
        harness
            .orchestrator
            .toggle_scanner(Arc::new(MockScanner::new()))
            .is_none()
    );
    assert_eq!(harness.orchestrator.phase(), Phase::Processing);
    assert!(harness.orchestrator.awaiting_identity());
}

#[tokio::test(start_paused = true)]
async fn new_attempt_discards_previous_attempt_data() {
    let api = MockPresenceApi::new();
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .with_api(api)
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();
    assert!(harness.orchestrator.view().checkin.is_some());

    harness.api.fail(Endpoint::Checkin, ApiFailure::rejected("duplicate"));
    harness.scan("CC101|S02").await.unwrap();

    assert!(harness.orchestrator.view().checkin.is_none());
}

#[tokio::test(start_paused = true)]
async fn snapshots_track_progress() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .build()
        .await
        .unwrap();
    let mut rx = harness.orchestrator.subscribe();

    harness.scan("CC101|S01").await.unwrap();

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.state.phase, Phase::Done);
    assert_eq!(snapshot.view, *harness.orchestrator.view());
    assert_eq!(snapshot.state.log.len(), harness.orchestrator.state().log.len());
}

#[tokio::test(start_paused = true)]
#[tracing_test::traced_test]
async fn activity_lines_are_traced() {
    let mut harness = TestHarness::builder()
        .with_user_id("mhs001")
        .build()
        .await
        .unwrap();
    harness.scan("CC101|S01").await.unwrap();

    assert!(logs_contain("Submitting check-in..."));
    assert!(logs_contain("check-in attempt started"));
}

/// A store whose disk has gone away.
struct UnreadableStore;

#[async_trait]
impl KeyValueStore for UnreadableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, PresenceError> {
        Err(PresenceError::Storage {
            source: "database is locked".into(),
        })
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), PresenceError> {
        Err(PresenceError::Storage {
            source: "database is locked".into(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn unreadable_identity_store_fails_the_scan() {
    let api = Arc::new(MockPresenceApi::new());
    let mut orchestrator = CheckinOrchestrator::new(
        IdentityStore::new(Arc::new(UnreadableStore)),
        api.clone(),
        LocationCollector::new(None),
        MotionCollector::new(None),
        CheckinSettings::default(),
    );
    let session = orchestrator
        .toggle_scanner(Arc::new(MockScanner::with_payloads(["CC101|S01"])))
        .unwrap();

    let err = orchestrator.scan_once(&session).await.unwrap_err();

    assert!(matches!(err, PresenceError::Storage { .. }));
    assert_eq!(orchestrator.phase(), Phase::Done);
    assert!(!orchestrator.awaiting_identity());
    assert_eq!(
        orchestrator.state().error.as_deref(),
        Some("storage error: database is locked")
    );
    assert!(api.calls().is_empty());
}
