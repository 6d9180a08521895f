// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence for the device and user identifiers.
//!
//! Provides a SQLite key-value store serialized through `tokio-rusqlite`'s
//! single background thread, an in-memory store for tests, and the
//! [`IdentityStore`] that sits on top of either.

pub mod database;
pub mod identity;
pub mod kv;
pub mod memory;

pub use database::Database;
pub use identity::{IdentityStore, DEVICE_ID_KEY, USER_ID_KEY};
pub use kv::SqliteKvStore;
pub use memory::MemoryKvStore;
