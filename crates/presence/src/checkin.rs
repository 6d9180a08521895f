// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `presence checkin`: runs one attempt for a scanned payload.

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use presence_checkin::{CheckinOrchestrator, CheckinSettings, ScanDisposition, Snapshot};
use presence_client::PresenceClient;
use presence_config::PresenceConfig;
use presence_core::{PresenceApi, PresenceError, QrScanner};
use presence_sensors::collectors_from_config;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{Mutex, watch};
use tracing::debug;

use crate::{open_identity, report};

/// A scanner for payloads decoded elsewhere and passed on the command line.
/// Yields its payload once, then waits like an idle camera.
struct ProvidedPayload {
    payload: Mutex<Option<String>>,
}

impl ProvidedPayload {
    fn new(payload: String) -> Self {
        Self {
            payload: Mutex::new(Some(payload)),
        }
    }
}

#[async_trait]
impl QrScanner for ProvidedPayload {
    async fn next_payload(&self) -> Result<String, PresenceError> {
        match self.payload.lock().await.take() {
            Some(payload) => Ok(payload),
            None => std::future::pending().await,
        }
    }
}

pub async fn run(
    config: &PresenceConfig,
    token: String,
    user_id: Option<String>,
) -> Result<(), PresenceError> {
    let identity = open_identity(config).await?;
    if let Some(user_id) = user_id {
        identity.set_user_id(&user_id).await?;
    }

    let client = PresenceClient::from_config(&config.client)?;
    debug!(base_url = client.base_url(), "presence service configured");
    let api: Arc<dyn PresenceApi> = Arc::new(client);
    let (location, motion) = collectors_from_config(&config.device, &config.checkin);
    let mut orchestrator = CheckinOrchestrator::new(
        identity,
        api,
        location,
        motion,
        CheckinSettings::from_config(&config.checkin),
    );

    let printer = tokio::spawn(print_activity(orchestrator.subscribe()));

    let session = orchestrator
        .toggle_scanner(Arc::new(ProvidedPayload::new(token)))
        .ok_or_else(|| PresenceError::Internal("scanner could not be opened".to_string()))?;
    let mut disposition = orchestrator.scan_once(&session).await?;

    while disposition == ScanDisposition::AwaitingIdentity {
        let entered = prompt_user_id()?;
        match orchestrator.provide_user_id(&entered).await {
            Ok(next) => disposition = next,
            Err(PresenceError::InvalidInput(message)) => eprintln!("{}", message.yellow()),
            Err(e) => return Err(e),
        }
    }

    let state = orchestrator.state().clone();
    let view = orchestrator.view().clone();
    drop(orchestrator);
    // The printer drains the last snapshot once the sender is gone.
    let _ = printer.await;

    report::print_attempt(&state, &view);
    match state.error {
        Some(message) => Err(PresenceError::Internal(format!("check-in aborted: {message}"))),
        None => Ok(()),
    }
}

async fn print_activity(mut snapshots: watch::Receiver<Snapshot>) {
    let mut printed = 0;
    while snapshots.changed().await.is_ok() {
        let log = snapshots.borrow_and_update().state.log.clone();
        for entry in log.entries().iter().skip(printed) {
            println!("{}", entry.to_string().dimmed());
        }
        printed = log.len();
    }
}

fn prompt_user_id() -> Result<String, PresenceError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| PresenceError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "A user id is required before checking in.".bold());
    match rl.readline(&format!("{}> ", "user id".green())) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(PresenceError::InvalidInput(
            "check-in cancelled: no user id entered".to_string(),
        )),
        Err(e) => Err(PresenceError::Internal(format!("failed to read user id: {e}"))),
    }
}
