// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Student-side check-in flow.
//!
//! - [`TokenResolver`]: turns a scanned payload into a course session
//! - [`ScanSession`]: one cancellable scanner activation
//! - [`CheckinOrchestrator`]: the `idle → scanning → processing → done`
//!   machine that gathers evidence, submits it, and reconciles the view

pub mod orchestrator;
pub mod scan;
pub mod token;
pub mod view;

pub use orchestrator::{CheckinOrchestrator, CheckinSettings, ScanDisposition};
pub use scan::ScanSession;
pub use token::{TokenResolver, DEFAULT_COURSE_ID, DEFAULT_SESSION_ID};
pub use view::{ActivityLog, ConsolidatedView, LogEntry, OrchestrationState, Phase, Snapshot};
