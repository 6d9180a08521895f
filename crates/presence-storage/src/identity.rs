// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device and user identity on top of a [`KeyValueStore`].

use std::sync::Arc;

use presence_core::{DeviceIdentity, KeyValueStore, PresenceError};
use tracing::info;

pub const DEVICE_ID_KEY: &str = "device_id";
pub const USER_ID_KEY: &str = "user_id";

/// Resolves and persists the per-device and per-user identifiers.
#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted device id, generating and persisting a UUID v4 on first use.
    ///
    /// A stored empty string counts as absent.
    pub async fn get_or_create_device_id(&self) -> Result<DeviceIdentity, PresenceError> {
        if let Some(existing) = self.store.get(DEVICE_ID_KEY).await?
            && !existing.is_empty()
        {
            return Ok(DeviceIdentity {
                device_id: existing,
            });
        }

        let device_id = uuid::Uuid::new_v4().to_string();
        self.store.set(DEVICE_ID_KEY, &device_id).await?;
        info!(%device_id, "generated new device id");
        Ok(DeviceIdentity { device_id })
    }

    /// Returns the user id, or an empty string when none has been entered.
    pub async fn user_id(&self) -> Result<String, PresenceError> {
        Ok(self.store.get(USER_ID_KEY).await?.unwrap_or_default())
    }

    /// Persists the user id. Surrounding whitespace is dropped.
    pub async fn set_user_id(&self, user_id: &str) -> Result<(), PresenceError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(PresenceError::InvalidInput(
                "user id must not be empty".to_string(),
            ));
        }
        self.store.set(USER_ID_KEY, user_id).await
    }
}
