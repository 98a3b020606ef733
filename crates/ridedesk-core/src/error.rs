// ── Core error types ──
//
// User-facing errors from ridedesk-core. Consumers never see raw HTTP
// status handling or JSON parse failures directly; the
// `From<ridedesk_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not signed in -- run `ridedesk login` first")]
    NotAuthenticated,

    #[error("Console is not connected")]
    ControllerDisconnected,

    #[error("Backend request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Skipped invalid {entity_type} record {identifier}: {reason}")]
    InvalidRecord {
        entity_type: String,
        identifier: String,
        reason: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Cannot {action} booking {booking_id}: booking is {state}")]
    InvalidTransition {
        booking_id: String,
        state: String,
        action: String,
    },

    #[error("{entity_type} {identifier} already has a request in flight")]
    Busy {
        entity_type: String,
        identifier: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Local precondition failure; nothing was sent to the backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed { .. } | Self::InvalidTransition { .. }
        )
    }

    /// The backend call failed (non-2xx, network, or timeout).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::AuthenticationFailed { .. }
                | Self::Timeout { .. }
                | Self::NotFound { .. }
                | Self::Api { .. }
        )
    }

    /// Re-authentication is required before retrying.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::NotAuthenticated
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ridedesk_api::Error> for CoreError {
    fn from(err: ridedesk_api::Error) -> Self {
        match err {
            ridedesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            ridedesk_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- sign in again".into(),
            },
            ridedesk_api::Error::Forbidden { message } => CoreError::AuthenticationFailed {
                message: format!("Access denied: {message}"),
            },
            ridedesk_api::Error::NotSignedIn => CoreError::NotAuthenticated,
            // The client folds its own timeouts into `Error::Timeout`.
            ridedesk_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ridedesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ridedesk_api::Error::InvalidPathSegment { segment } => CoreError::ValidationFailed {
                field: "id".into(),
                message: format!("{segment:?} cannot be used as an identifier"),
            },
            ridedesk_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            ridedesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ridedesk_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message,
            },
            ridedesk_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ridedesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
