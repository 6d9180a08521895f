// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value persistence for locally held identifiers.

use async_trait::async_trait;

use crate::error::PresenceError;

/// A flat string key-value store with no expiry.
///
/// Backs the device and user identifiers. Implementations must make a `set`
/// visible to every later `get` on the same store.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, PresenceError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), PresenceError>;
}
