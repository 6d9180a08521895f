// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellable scanner sessions.

use std::sync::Arc;

use presence_core::{PresenceError, QrScanner};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One activation of the scanner.
///
/// Clones share the same cancellation token, so a presentation layer can hold
/// one half and stop the scan while another task waits on [`next_token`](Self::next_token).
#[derive(Clone)]
pub struct ScanSession {
    scanner: Arc<dyn QrScanner>,
    cancel: CancellationToken,
}

impl ScanSession {
    pub fn new(scanner: Arc<dyn QrScanner>) -> Self {
        Self {
            scanner,
            cancel: CancellationToken::new(),
        }
    }

    /// Waits for the next payload. `Ok(None)` once the session is cancelled.
    pub async fn next_token(&self) -> Result<Option<String>, PresenceError> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("scan cancelled");
                Ok(None)
            }
            payload = self.scanner.next_payload() => payload.map(Some),
        }
    }

    /// Stops the scan. A pending [`next_token`](Self::next_token) resolves to `None` immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
