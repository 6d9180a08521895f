// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `presence identity`.

use colored::Colorize;
use presence_config::PresenceConfig;
use presence_core::PresenceError;

use crate::open_identity;

pub async fn show(config: &PresenceConfig) -> Result<(), PresenceError> {
    let identity = open_identity(config).await?;
    let device = identity.get_or_create_device_id().await?;
    let user_id = identity.user_id().await?;

    println!("{:<10} {}", "device id".bold(), device.device_id);
    if user_id.is_empty() {
        println!("{:<10} {}", "user id".bold(), "(not set)".dimmed());
    } else {
        println!("{:<10} {user_id}", "user id".bold());
    }
    Ok(())
}

pub async fn set_user(config: &PresenceConfig, user_id: &str) -> Result<(), PresenceError> {
    let identity = open_identity(config).await?;
    identity.set_user_id(user_id).await?;
    println!("{} user id set to {}", "✓".green(), user_id.trim());
    Ok(())
}
