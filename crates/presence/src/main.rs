// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presence - attendance check-in from the terminal.
//!
//! Students check in with a scanned QR payload; lecturers generate the QR
//! for a course session.

mod checkin;
mod identity;
mod lecturer;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use presence_config::PresenceConfig;
use presence_core::PresenceError;
use presence_storage::{IdentityStore, SqliteKvStore};
use std::sync::Arc;

/// Presence - attendance check-in with location and motion evidence.
#[derive(Parser, Debug)]
#[command(name = "presence", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check in to a course session with a scanned QR payload.
    Checkin {
        /// The decoded QR payload.
        token: String,
        /// Store this user id before checking in.
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Generate the QR code for a course session (lecturer).
    Qr {
        course_id: String,
        session_id: String,
    },
    /// Show the stored user's attendance status for a course session.
    Status {
        course_id: String,
        session_id: String,
    },
    /// Show this device's recorded GPS track.
    History {
        /// Maximum number of points (defaults to `checkin.history_limit`).
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show or change the stored identifiers.
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },
}

#[derive(Subcommand, Debug)]
enum IdentityAction {
    /// Print the device id and user id.
    Show,
    /// Replace the stored user id.
    SetUser { user_id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => presence_config::load_and_validate_path(path),
        None => presence_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            presence_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.client.log_level);

    let result = match cli.command {
        Commands::Checkin { token, user_id } => checkin::run(&config, token, user_id).await,
        Commands::Qr {
            course_id,
            session_id,
        } => lecturer::run(&config, &course_id, &session_id).await,
        Commands::Status {
            course_id,
            session_id,
        } => report::status(&config, &course_id, &session_id).await,
        Commands::History { limit } => report::history(&config, limit).await,
        Commands::Identity { action } => match action {
            IdentityAction::Show => identity::show(&config).await,
            IdentityAction::SetUser { user_id } => identity::set_user(&config, &user_id).await,
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Opens the identity store backed by the configured SQLite file.
pub(crate) async fn open_identity(config: &PresenceConfig) -> Result<IdentityStore, PresenceError> {
    let store = SqliteKvStore::open(&config.storage).await?;
    Ok(IdentityStore::new(Arc::new(store)))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("presence={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
