// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote service client for the attendance and telemetry API.
//!
//! [`PresenceClient`] implements [`presence_core::PresenceApi`] over HTTP/JSON.
//! Every response is decoded from the service's `{ok, data | error}`
//! envelope, and any transport or decoding failure comes back as an
//! [`presence_core::ApiFailure`] rather than a panic.

pub mod client;
pub mod wire;

pub use client::PresenceClient;
