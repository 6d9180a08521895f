// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-shot geolocation reads.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use presence_core::traits::location::PositionOptions;
use presence_core::{GpsSample, LocationSource, PresenceError};
use tracing::debug;

/// Reads one location fix per call.
#[derive(Clone)]
pub struct LocationCollector {
    source: Option<Arc<dyn LocationSource>>,
    high_accuracy: bool,
}

impl LocationCollector {
    /// `None` models a device without geolocation capability.
    pub fn new(source: Option<Arc<dyn LocationSource>>) -> Self {
        Self {
            source,
            high_accuracy: true,
        }
    }

    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }

    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }

    /// Reads the current position, giving up after `timeout`.
    ///
    /// Errors:
    /// - [`PresenceError::LocationUnavailable`] when there is no source
    /// - [`PresenceError::LocationTimeout`] when `timeout` elapses first
    /// - whatever the source reports (typically [`PresenceError::LocationDenied`])
    pub async fn read(&self, timeout: Duration) -> Result<GpsSample, PresenceError> {
        let source = self
            .source
            .as_ref()
            .ok_or(PresenceError::LocationUnavailable)?;

        let options = PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout,
        };

        let coords = tokio::time::timeout(timeout, source.current_position(options))
            .await
            .map_err(|_| {
                PresenceError::LocationTimeout(format!(
                    "location request timed out after {} ms",
                    timeout.as_millis()
                ))
            })??;

        let sample = GpsSample {
            lat: coords.latitude,
            lng: coords.longitude,
            accuracy_m: coords.accuracy.max(0.0).round() as u32,
            ts: Utc::now(),
        };
        debug!(lat = sample.lat, lng = sample.lng, accuracy_m = sample.accuracy_m, "location read");
        Ok(sample)
    }
}
