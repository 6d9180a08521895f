// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sensor collectors for the check-in pipeline.
//!
//! - [`LocationCollector`]: one-shot location read with a hard timeout. Fails
//!   when the device has no geolocation or the read is refused.
//! - [`MotionCollector`]: fixed-window accelerometer batch. Never fails;
//!   missing or silent sensors degrade to synthetic rest-state samples.

pub mod desktop;
pub mod location;
pub mod motion;

pub use desktop::{collectors_from_config, FixedLocationSource, NoMotionSensor};
pub use location::LocationCollector;
pub use motion::{synthetic_rest_batch, MotionCollector, SYNTHETIC_BATCH_LEN};
