// SPDX-FileCopyrightText: 2026 Presence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the presence check-in client.

use std::fmt;

use strum::Display;
use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// Local storage errors (database open, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP transport errors outside the remote call contract.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A payload could not be decoded.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// The platform exposes no geolocation capability.
    #[error("geolocation is not supported on this device")]
    LocationUnavailable,

    /// The location read was refused (usually a permission prompt).
    #[error("GPS error: {0}")]
    LocationDenied(String),

    /// The location read did not settle in time.
    #[error("GPS error: {0}")]
    LocationTimeout(String),

    /// Caller-supplied input was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PresenceError {
    /// Whether this error must abort an in-flight check-in attempt.
    ///
    /// Sensor-acquisition and local storage failures are fatal. Transport and
    /// decoding failures are absorbed by the caller and never abort.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PresenceError::Transport { .. } | PresenceError::Decode { .. }
        )
    }
}

/// Outcome category of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The request never produced a response (DNS, connect, reset).
    Transport,
    /// A response arrived but was not a readable `{ok, data|error}` envelope.
    Decode,
    /// The service answered `ok: false`.
    Rejected,
}

/// Normalized failure of a remote call. This is the `{ok: false, error}` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Decode,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Rejected,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiFailure {}

impl From<ApiFailure> for PresenceError {
    fn from(failure: ApiFailure) -> Self {
        match failure.kind {
            FailureKind::Decode => PresenceError::Decode {
                message: failure.message,
            },
            FailureKind::Transport | FailureKind::Rejected => PresenceError::Transport {
                message: failure.message,
                source: None,
            },
        }
    }
}

/// Result of a remote call. Every endpoint wrapper returns this and never panics.
pub type ApiResult<T> = Result<T, ApiFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_and_storage_errors_are_fatal() {
        assert!(PresenceError::LocationUnavailable.is_fatal());
        assert!(PresenceError::LocationDenied("User denied Geolocation".into()).is_fatal());
        assert!(PresenceError::LocationTimeout("Timeout expired".into()).is_fatal());
        assert!(
            PresenceError::Storage {
                source: "disk full".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn network_errors_are_not_fatal() {
        let transport: PresenceError = ApiFailure::transport("connection refused").into();
        let decode: PresenceError = ApiFailure::decode("expected value").into();
        assert!(!transport.is_fatal());
        assert!(!decode.is_fatal());
    }

    #[test]
    fn denied_message_is_passed_through() {
        let err = PresenceError::LocationDenied("User denied Geolocation".into());
        assert_eq!(err.to_string(), "GPS error: User denied Geolocation");
    }

    #[test]
    fn api_failure_displays_bare_message() {
        let failure = ApiFailure::rejected("token expired");
        assert_eq!(failure.to_string(), "token expired");
        assert_eq!(failure.kind, FailureKind::Rejected);
    }
}
