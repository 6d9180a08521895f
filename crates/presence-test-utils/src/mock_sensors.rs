// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock location and motion sources.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use presence_core::traits::location::{Coordinates, PositionOptions};
use presence_core::traits::motion::{Axes, MotionEvent, MotionSubscription};
use presence_core::{LocationSource, MotionSource, PresenceError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::lock;

#[derive(Debug, Clone)]
enum LocationScript {
    Fix(Coordinates),
    Denied(String),
    Stall,
}

/// A [`LocationSource`] with one scripted outcome.
#[derive(Debug)]
pub struct MockLocationSource {
    script: LocationScript,
    reads: AtomicUsize,
    last_options: Mutex<Option<PositionOptions>>,
}

impl MockLocationSource {
    fn with_script(script: LocationScript) -> Self {
        Self {
            script,
            reads: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// Every read succeeds with these coordinates.
    pub fn fix(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self::with_script(LocationScript::Fix(Coordinates {
            latitude,
            longitude,
            accuracy,
        }))
    }

    /// Every read fails with [`PresenceError::LocationDenied`].
    pub fn denied(message: impl Into<String>) -> Self {
        Self::with_script(LocationScript::Denied(message.into()))
    }

    /// Reads never complete; the collector's timeout decides.
    pub fn stalled() -> Self {
        Self::with_script(LocationScript::Stall)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<PositionOptions> {
        *lock(&self.last_options)
    }
}

#[async_trait]
impl LocationSource for MockLocationSource {
    async fn current_position(&self, options: PositionOptions) -> Result<Coordinates, PresenceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_options) = Some(options);
        match &self.script {
            LocationScript::Fix(coords) => Ok(*coords),
            LocationScript::Denied(message) => Err(PresenceError::LocationDenied(message.clone())),
            LocationScript::Stall => std::future::pending().await,
        }
    }
}

/// A [`MotionSource`] that delivers a fixed list of events on every subscription.
///
/// Events are queued at subscribe time, so they all arrive at the start of
/// the window.
#[derive(Debug, Default)]
pub struct ScriptedMotionSource {
    events: Vec<MotionEvent>,
    subscriptions: Mutex<Vec<CancellationToken>>,
}

impl ScriptedMotionSource {
    pub fn new(events: Vec<MotionEvent>) -> Self {
        Self {
            events,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Present but never fires.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    /// Events from `(x, y, z)` gravity-inclusive readings.
    pub fn from_readings(readings: &[(f64, f64, f64)]) -> Self {
        Self::new(
            readings
                .iter()
                .map(|&(x, y, z)| MotionEvent {
                    acceleration_including_gravity: Some(Axes {
                        x: Some(x),
                        y: Some(y),
                        z: Some(z),
                    }),
                })
                .collect(),
        )
    }

    pub fn subscription_count(&self) -> usize {
        lock(&self.subscriptions).len()
    }

    /// True once every subscription handed out has been stopped.
    pub fn all_stopped(&self) -> bool {
        lock(&self.subscriptions).iter().all(|t| t.is_cancelled())
    }
}

impl MotionSource for ScriptedMotionSource {
    fn subscribe(&self) -> Option<MotionSubscription> {
        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in &self.events {
            // Capacity covers every event.
            let _ = tx.try_send(*event);
        }
        let stop = CancellationToken::new();
        lock(&self.subscriptions).push(stop.clone());
        Some(MotionSubscription::new(rx, stop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use presence_sensors::{LocationCollector, MotionCollector};

    #[tokio::test]
    async fn denied_location_propagates_message() {
        let source = Arc::new(MockLocationSource::denied("User denied Geolocation"));
        let collector = LocationCollector::new(Some(source.clone() as Arc<dyn LocationSource>));

        let err = collector.read(Duration::from_secs(10)).await.unwrap_err();
        assert_eq!(err.to_string(), "GPS error: User denied Geolocation");
        assert_eq!(source.read_count(), 1);
        assert!(source.last_options().unwrap().high_accuracy);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_events_are_collected_and_listener_stopped() {
        let source = Arc::new(ScriptedMotionSource::from_readings(&[
            (0.1, 0.2, 9.8),
            (0.0, 0.1, 9.7),
        ]));
        let collector = MotionCollector::new(Some(source.clone() as Arc<dyn MotionSource>));

        let samples = collector.collect(Duration::from_millis(3000)).await;
        assert_eq!(samples.len(), 2);
        assert_eq!(source.subscription_count(), 1);
        assert!(source.all_stopped());
    }
}
