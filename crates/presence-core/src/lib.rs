// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the presence check-in client.
//!
//! This crate provides the error type, the check-in data model, and the
//! adapter traits behind which every external collaborator sits: local
//! key-value storage, geolocation, motion sensing, QR scanning and the remote
//! attendance service.

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{ApiFailure, ApiResult, FailureKind, PresenceError};
pub use types::{
    AccelLatest, AccelSample, CheckinRequest, CheckinResult, DeviceIdentity, GpsHistoryPoint,
    GpsSample, PresenceStatus, QrTicket, ResolvedSession, StatusBadge,
};

pub use traits::{
    KeyValueStore, LocationSource, MotionSource, PresenceApi, QrScanner,
};
