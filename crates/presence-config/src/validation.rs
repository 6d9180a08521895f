// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! URL shape, non-empty paths, positive durations and coordinate ranges.

use crate::diagnostic::ConfigError;
use crate::model::PresenceConfig;

/// Largest history window the service is asked for.
const MAX_HISTORY_LIMIT: u32 = 1000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &PresenceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.client.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "client.base_url must not be empty".to_string(),
        });
    } else if !is_http_url(base_url) {
        errors.push(ConfigError::Validation {
            message: format!(
                "client.base_url `{base_url}` must be an absolute http:// or https:// URL"
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.checkin.motion_window_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "checkin.motion_window_ms must be greater than 0".to_string(),
        });
    }

    if config.checkin.location_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "checkin.location_timeout_ms must be greater than 0".to_string(),
        });
    }

    let limit = config.checkin.history_limit;
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        errors.push(ConfigError::Validation {
            message: format!(
                "checkin.history_limit must be between 1 and {MAX_HISTORY_LIMIT}, got {limit}"
            ),
        });
    }

    let device = &config.device;
    if device.latitude.is_some() != device.longitude.is_some() {
        errors.push(ConfigError::Validation {
            message: "device.latitude and device.longitude must be set together".to_string(),
        });
    }

    if let Some(lat) = device.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        errors.push(ConfigError::Validation {
            message: format!("device.latitude must be within [-90, 90], got {lat}"),
        });
    }

    if let Some(lng) = device.longitude
        && !(-180.0..=180.0).contains(&lng)
    {
        errors.push(ConfigError::Validation {
            message: format!("device.longitude must be within [-180, 180], got {lng}"),
        });
    }

    if let Some(acc) = device.accuracy_m
        && acc < 0.0
    {
        errors.push(ConfigError::Validation {
            message: format!("device.accuracy_m must be non-negative, got {acc}"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}
