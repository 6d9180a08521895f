// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators of a check-in.
//!
//! Every trait uses `#[async_trait]` so adapters can be held as
//! `Arc<dyn Trait>` and swapped for test doubles.

pub mod api;
pub mod kv;
pub mod location;
pub mod motion;
pub mod scanner;

pub use api::PresenceApi;
pub use kv::KeyValueStore;
pub use location::{Coordinates, LocationSource, PositionOptions};
pub use motion::{Axes, MotionEvent, MotionSource, MotionSubscription};
pub use scanner::QrScanner;
