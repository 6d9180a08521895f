// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window accelerometer capture.
//!
//! A capture subscribes to the motion source, records every event until the
//! window timer fires, then stops the subscription. Callers always receive
//! at least one sample:
//!
//! | Situation | Result |
//! |---|---|
//! | no motion capability | [`SYNTHETIC_BATCH_LEN`] synthetic rest samples, immediately |
//! | capability present, no events in window | one `{0, 0, 9.8}` sample |
//! | events captured | one sample per event, capture order |

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use presence_core::traits::motion::MotionEvent;
use presence_core::{AccelSample, MotionSource};
use rand::Rng;
use tracing::debug;

/// Number of samples synthesized when the device has no motion sensor.
pub const SYNTHETIC_BATCH_LEN: usize = 10;

/// Gravity used for the single placeholder sample of a silent window.
const RESTING_Z: f64 = 9.8;

/// Collects accelerometer batches over a fixed window.
#[derive(Clone)]
pub struct MotionCollector {
    source: Option<Arc<dyn MotionSource>>,
}

impl MotionCollector {
    /// `None` models a device without motion capability.
    pub fn new(source: Option<Arc<dyn MotionSource>>) -> Self {
        Self { source }
    }

    /// Captures samples for `window`. Never fails and never returns an empty batch.
    pub async fn collect(&self, window: Duration) -> Vec<AccelSample> {
        let Some(mut subscription) = self.source.as_ref().and_then(|s| s.subscribe()) else {
            debug!("no motion capability, synthesizing rest-state batch");
            return synthetic_rest_batch(&mut rand::thread_rng());
        };

        let mut samples = Vec::new();
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);
        let mut source_open = true;

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = subscription.recv(), if source_open => match event {
                    Some(event) => samples.extend(to_sample(event)),
                    // Source went away early; the window still runs to completion.
                    None => source_open = false,
                },
            }
        }
        subscription.stop();

        debug!(count = samples.len(), window_ms = window.as_millis() as u64, "motion window closed");

        if samples.is_empty() {
            samples.push(AccelSample {
                t: Utc::now(),
                x: 0.0,
                y: 0.0,
                z: RESTING_Z,
            });
        }
        samples
    }
}

/// Converts one event using its gravity-inclusive reading. Events without one are skipped.
fn to_sample(event: MotionEvent) -> Option<AccelSample> {
    let axes = event.acceleration_including_gravity?;
    Some(AccelSample {
        t: Utc::now(),
        x: round3(axes.x.unwrap_or(0.0)),
        y: round3(axes.y.unwrap_or(0.0)),
        z: round3(axes.z.unwrap_or(0.0)),
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// A plausible device-at-rest batch: lateral axes in `[0, 0.5]`, vertical in `[9.7, 10.0]`.
pub fn synthetic_rest_batch<R: Rng + ?Sized>(rng: &mut R) -> Vec<AccelSample> {
    (0..SYNTHETIC_BATCH_LEN)
        .map(|_| AccelSample {
            t: Utc::now(),
            x: round3(rng.gen_range(0.0..0.5)),
            y: round3(rng.gen_range(0.0..0.5)),
            z: round3(9.7 + rng.gen_range(0.0..0.3)),
        })
        .collect()
}
