// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform motion-sensor adapter.
//!
//! Motion events are push-based, so a source hands out a
//! [`MotionSubscription`]: a receiving end for events plus a stop handle that
//! detaches the platform listener.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Acceleration along the three device axes in m/s². Platforms may omit axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Axes {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

/// One motion event. Only the gravity-inclusive reading is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionEvent {
    pub acceleration_including_gravity: Option<Axes>,
}

/// An active listener on a motion source.
///
/// The source keeps emitting until [`stop`](Self::stop) is called or the
/// subscription is dropped.
#[derive(Debug)]
pub struct MotionSubscription {
    events: mpsc::Receiver<MotionEvent>,
    stop: CancellationToken,
}

impl MotionSubscription {
    /// Wraps an event receiver. The source must stop emitting once `stop` is cancelled.
    pub fn new(events: mpsc::Receiver<MotionEvent>, stop: CancellationToken) -> Self {
        Self { events, stop }
    }

    /// Waits for the next event. Returns `None` once the source has gone away.
    pub async fn recv(&mut self) -> Option<MotionEvent> {
        self.events.recv().await
    }

    /// Detaches the listener. Idempotent.
    pub fn stop(&mut self) {
        self.stop.cancel();
        self.events.close();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }
}

impl Drop for MotionSubscription {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

/// A device motion sensor.
pub trait MotionSource: Send + Sync + 'static {
    /// Starts listening. `None` means the platform has no motion capability.
    fn subscribe(&self) -> Option<MotionSubscription>;
}
