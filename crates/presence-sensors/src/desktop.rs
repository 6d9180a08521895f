// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sensor adapters for hosts without real hardware.
//!
//! A terminal has neither GPS nor an accelerometer. Position comes from the
//! `[device]` config section when set; motion is always reported as absent,
//! which sends the pipeline down the synthetic-batch path.

use std::sync::Arc;

use async_trait::async_trait;
use presence_config::model::{CheckinConfig, DeviceConfig};
use presence_core::traits::location::{Coordinates, PositionOptions};
use presence_core::traits::motion::MotionSubscription;
use presence_core::{LocationSource, MotionSource, PresenceError};

use crate::{LocationCollector, MotionCollector};

/// Reports the same configured position on every read.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationSource {
    coordinates: Coordinates,
}

impl FixedLocationSource {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            coordinates: Coordinates {
                latitude,
                longitude,
                accuracy,
            },
        }
    }

    /// `None` when the config carries no position.
    pub fn from_config(device: &DeviceConfig) -> Option<Self> {
        device
            .fixed_position()
            .map(|(lat, lng, accuracy)| Self::new(lat, lng, accuracy))
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn current_position(&self, _options: PositionOptions) -> Result<Coordinates, PresenceError> {
        Ok(self.coordinates)
    }
}

/// A motion source for hosts without an accelerometer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMotionSensor;

impl MotionSource for NoMotionSensor {
    fn subscribe(&self) -> Option<MotionSubscription> {
        None
    }
}

/// Builds both collectors for the current host from config.
pub fn collectors_from_config(
    device: &DeviceConfig,
    checkin: &CheckinConfig,
) -> (LocationCollector, MotionCollector) {
    let location = FixedLocationSource::from_config(device)
        .map(|source| Arc::new(source) as Arc<dyn LocationSource>);
    let location = LocationCollector::new(location).with_high_accuracy(checkin.high_accuracy);
    let motion = MotionCollector::new(Some(Arc::new(NoMotionSensor)));
    (location, motion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn configured_position_is_reported() {
        let device = DeviceConfig {
            latitude: Some(-6.2),
            longitude: Some(106.8),
            accuracy_m: None,
        };
        let (location, _) = collectors_from_config(&device, &CheckinConfig::default());

        let sample = location.read(Duration::from_secs(1)).await.unwrap();
        assert_eq!((sample.lat, sample.lng, sample.accuracy_m), (-6.2, 106.8, 10));
    }

    #[tokio::test]
    async fn unconfigured_position_is_unavailable() {
        let (location, _) =
            collectors_from_config(&DeviceConfig::default(), &CheckinConfig::default());

        assert!(!location.is_available());
        let err = location.read(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, PresenceError::LocationUnavailable));
    }

    #[tokio::test]
    async fn host_motion_falls_back_to_synthetic_batch() {
        let (_, motion) = collectors_from_config(&DeviceConfig::default(), &CheckinConfig::default());
        let samples = motion.collect(Duration::from_millis(3000)).await;
        assert_eq!(samples.len(), crate::SYNTHETIC_BATCH_LEN);
    }
}
