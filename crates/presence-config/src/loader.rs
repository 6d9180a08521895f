// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./presence.toml` > `~/.config/presence/presence.toml`
//! > `/etc/presence/presence.toml`, with `PRESENCE_` environment overrides.

#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PresenceConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/presence/presence.toml`
/// 3. `~/.config/presence/presence.toml`
/// 4. `./presence.toml`
/// 5. `PRESENCE_*` environment variables
pub fn load_config() -> Result<PresenceConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PresenceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PresenceConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PresenceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PresenceConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PresenceConfig::default()))
        .merge(Toml::file("/etc/presence/presence.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("presence/presence.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("presence.toml"))
        .merge(env_provider())
}

/// Top-level config sections, in the order env keys are matched against.
const SECTIONS: [&str; 4] = ["client", "checkin", "storage", "device"];

/// Maps `PRESENCE_*` variables onto dotted section keys.
///
/// `PRESENCE_CLIENT_BASE_URL` becomes `client.base_url`; only the first
/// underscore after the section name is a separator.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PRESENCE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| format!("{section}.{field}"))
        })
        .unwrap_or_else(|| key.to_string())
}
