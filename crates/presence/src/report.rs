// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of check-in results, status, and GPS history.

use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use presence_checkin::{ConsolidatedView, OrchestrationState};
use presence_client::PresenceClient;
use presence_config::PresenceConfig;
use presence_core::{GpsHistoryPoint, GpsSample, PresenceApi, PresenceError, StatusBadge};

use crate::open_identity;

pub fn badge(status: &str) -> ColoredString {
    let badge = StatusBadge::classify(status);
    let label = badge.to_string();
    match badge {
        StatusBadge::Present => label.green().bold(),
        StatusBadge::Failed => label.red().bold(),
        StatusBadge::Pending => label.yellow().bold(),
        StatusBadge::Other(_) => label.normal(),
    }
}

fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_gps(sample: &GpsSample) -> String {
    format!(
        "{:.6}, {:.6} (±{} m) at {}",
        sample.lat,
        sample.lng,
        sample.accuracy_m,
        local_time(&sample.ts)
    )
}

fn format_history_point(point: &GpsHistoryPoint) -> String {
    format!("{}  {:.6}, {:.6}", local_time(&point.ts), point.lat, point.lng)
}

/// Summary printed after `presence checkin`.
pub fn print_attempt(state: &OrchestrationState, view: &ConsolidatedView) {
    println!();
    if let Some(error) = &state.error {
        println!("{} {}", "✗".red(), error.red());
    }

    if let Some(session) = &view.session {
        println!(
            "{:<10} {} / {}",
            "session".bold(),
            session.course_id,
            session.session_id
        );
    }
    if let Some(result) = &view.checkin {
        println!(
            "{:<10} {} {}",
            "check-in".bold(),
            badge(&result.status),
            result.message.dimmed()
        );
    }
    // Withheld, not defaulted, when the status fetch failed.
    if let Some(status) = &view.status {
        match status.checked_in_at {
            Some(at) => println!(
                "{:<10} {} since {}",
                "status".bold(),
                badge(&status.status),
                local_time(&at)
            ),
            None => println!("{:<10} {}", "status".bold(), badge(&status.status)),
        }
    }
    if let Some(gps) = view.display_gps() {
        println!("{:<10} {}", "gps".bold(), format_gps(gps));
    }
    if let Some(last) = view.accel_samples.last() {
        println!(
            "{:<10} {} samples, last x={:.3} y={:.3} z={:.3}",
            "motion".bold(),
            view.accel_samples.len(),
            last.x,
            last.y,
            last.z
        );
    }
    if let Some(latest) = &view.accel_latest {
        println!(
            "{:<10} x={:.3} y={:.3} z={:.3} at {}",
            "accel".bold(),
            latest.x,
            latest.y,
            latest.z,
            local_time(&latest.ts)
        );
    }
    if !view.gps_history.is_empty() {
        println!("{:<10} {} points", "track".bold(), view.gps_history.len());
    }
}

/// `presence status`.
pub async fn status(
    config: &PresenceConfig,
    course_id: &str,
    session_id: &str,
) -> Result<(), PresenceError> {
    let identity = open_identity(config).await?;
    let user_id = identity.user_id().await?;
    if user_id.is_empty() {
        return Err(PresenceError::InvalidInput(
            "no user id stored; run `presence identity set-user <ID>` first".to_string(),
        ));
    }

    let client = PresenceClient::from_config(&config.client)?;
    let status = client
        .presence_status(&user_id, course_id, session_id)
        .await?;

    print!("{} {}", badge(&status.status), status.status.dimmed());
    match status.checked_in_at {
        Some(at) => println!(" (checked in {})", local_time(&at)),
        None => println!(),
    }
    Ok(())
}

/// `presence history`.
pub async fn history(config: &PresenceConfig, limit: Option<u32>) -> Result<(), PresenceError> {
    let identity = open_identity(config).await?;
    let device = identity.get_or_create_device_id().await?;
    let limit = limit.unwrap_or(config.checkin.history_limit);

    let client = PresenceClient::from_config(&config.client)?;
    let points = client.gps_history(&device.device_id, Some(limit)).await?;

    if points.is_empty() {
        println!("{}", "no GPS history for this device".dimmed());
        return Ok(());
    }
    for point in &points {
        println!("{}", format_history_point(point));
    }
    println!("{}", format!("{} points", points.len()).dimmed());
    Ok(())
}
