// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! QR scanner adapter.

use async_trait::async_trait;

use crate::error::PresenceError;

/// A camera-backed QR decoder.
#[async_trait]
pub trait QrScanner: Send + Sync + 'static {
    /// Waits for the next decoded payload.
    ///
    /// Cancelling the returned future must release the camera.
    async fn next_payload(&self) -> Result<String, PresenceError>;
}
