// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `presence qr`: lecturer-side QR issuance.

use colored::Colorize;
use presence_client::PresenceClient;
use presence_config::PresenceConfig;
use presence_core::{PresenceApi, PresenceError, QrTicket};
use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;

pub async fn run(
    config: &PresenceConfig,
    course_id: &str,
    session_id: &str,
) -> Result<(), PresenceError> {
    let client = PresenceClient::from_config(&config.client)?;
    let ticket = issue(&client, course_id, session_id).await?;

    println!("{}", render_qr(&ticket.qr_token)?);
    println!("{:<8} {}", "token".bold(), ticket.qr_token);
    println!(
        "{:<8} {}",
        "expires".bold(),
        ticket
            .expires_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

/// Validates the ids and requests a ticket.
pub async fn issue(
    api: &dyn PresenceApi,
    course_id: &str,
    session_id: &str,
) -> Result<QrTicket, PresenceError> {
    let course_id = course_id.trim();
    let session_id = session_id.trim();
    if course_id.is_empty() || session_id.is_empty() {
        return Err(PresenceError::InvalidInput(
            "course id and session id are required".to_string(),
        ));
    }
    Ok(api.generate_qr(course_id, session_id).await?)
}

fn render_qr(token: &str) -> Result<String, PresenceError> {
    let code = QrCode::new(token.as_bytes())
        .map_err(|e| PresenceError::Internal(format!("failed to encode QR code: {e}")))?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_core::ApiFailure;
    use presence_test_utils::{ApiCall, Endpoint, MockPresenceApi};

    #[tokio::test]
    async fn blank_ids_are_rejected_before_any_request() {
        let api = MockPresenceApi::new();
        let err = issue(&api, "  ", "S01").await.unwrap_err();
        assert_eq!(err.to_string(), "invalid input: course id and session id are required");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn ids_are_trimmed() {
        let api = MockPresenceApi::new();
        let ticket = issue(&api, " CC101 ", "S01\n").await.unwrap();
        assert_eq!(ticket.qr_token, "mock-qr-token");
        assert_eq!(
            api.calls(),
            vec![ApiCall::GenerateQr {
                course_id: "CC101".into(),
                session_id: "S01".into(),
            }]
        );
    }

    #[tokio::test]
    async fn service_rejection_becomes_error() {
        let api = MockPresenceApi::new()
            .failing(Endpoint::GenerateQr, ApiFailure::rejected("course not found"));
        let err = issue(&api, "CC999", "S01").await.unwrap_err();
        assert!(err.to_string().contains("course not found"));
    }

    #[test]
    fn renders_multiline_qr() {
        let rendered = render_qr("CC101|S01").unwrap();
        assert!(rendered.lines().count() > 10);
    }
}
