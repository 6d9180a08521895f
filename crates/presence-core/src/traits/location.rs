// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform geolocation adapter.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PresenceError;

/// Options passed to a single position read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Raw coordinates as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in metres.
    pub accuracy: f64,
}

/// A one-shot geolocation reader.
///
/// Failures should be reported as [`PresenceError::LocationDenied`] or
/// [`PresenceError::LocationTimeout`] carrying the platform's message.
#[async_trait]
pub trait LocationSource: Send + Sync + 'static {
    async fn current_position(&self, options: PositionOptions)
        -> Result<Coordinates, PresenceError>;
}
