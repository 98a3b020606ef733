use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `ridedesk-api` crate.
///
/// Covers every failure mode of the admin backend surface:
/// authentication, transport, structured API errors, and decoding.
/// `ridedesk-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in rejected (wrong credentials, disabled account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The bearer token was rejected (HTTP 401). The session has been cleared.
    #[error("Session expired -- sign in again")]
    SessionExpired,

    /// The bearer token lacks the admin role (HTTP 403). The session has been cleared.
    #[error("Access denied: {message}")]
    Forbidden { message: String },

    /// An admin call was attempted without a bearer token.
    #[error("Not signed in -- no access token available")]
    NotSignedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An entity id that cannot stand as one URL path segment.
    #[error("Invalid id {segment:?}: must not be empty, \".\" or \"..\"")]
    InvalidPathSegment { segment: String },

    /// Request timed out.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response from the backend, with the folded `message` field.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the caller must sign in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::SessionExpired
                | Self::Forbidden { .. }
                | Self::NotSignedIn
        )
    }

    /// Returns `true` if this is a transient error worth retrying by hand.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
