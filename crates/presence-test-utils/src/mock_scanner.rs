// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock QR scanner.

use async_trait::async_trait;
use presence_core::{PresenceError, QrScanner};
use tokio::sync::{Mutex, mpsc};

/// Hands out queued payloads in order. With an empty queue a scan waits
/// until a payload is pushed, like a camera pointed at nothing.
pub struct MockScanner {
    tx: mpsc::UnboundedSender<String>,
    rx: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl MockScanner {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    pub fn with_payloads<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scanner = Self::new();
        for payload in payloads {
            scanner.push(payload);
        }
        scanner
    }

    /// Queues a payload for the next scan.
    pub fn push(&self, payload: impl Into<String>) {
        // The receiver lives as long as `self`.
        let _ = self.tx.send(payload.into());
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QrScanner for MockScanner {
    async fn next_payload(&self) -> Result<String, PresenceError> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| PresenceError::Internal("mock scanner closed".to_string()))
    }
}
