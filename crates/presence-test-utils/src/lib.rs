// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for presence integration tests.
//!
//! Deterministic stand-ins for every external collaborator of the check-in
//! orchestrator, so end-to-end flows run without a network, GPS or camera.
//!
//! # Components
//!
//! - [`MockPresenceApi`] - scripted per-endpoint outcomes with call recording
//! - [`MockLocationSource`] - fixed fix, permission denial, or a stalled read
//! - [`ScriptedMotionSource`] - replays a fixed set of motion events
//! - [`MockScanner`] - queued QR payloads
//! - [`TestHarness`] - orchestrator wired to all of the above

pub mod harness;
pub mod mock_api;
pub mod mock_scanner;
pub mod mock_sensors;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_api::{ApiCall, Endpoint, MockPresenceApi};
pub use mock_scanner::MockScanner;
pub use mock_sensors::{MockLocationSource, ScriptedMotionSource};

/// Recovers the guard from a poisoned lock; mocks hold no invariants across panics.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
