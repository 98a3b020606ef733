//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use ridedesk_config::ConfigError;
use ridedesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}: {reason}")]
    #[diagnostic(
        code(ridedesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             URL: {url}\n\
             Use --insecure (-k) for staging backends with self-signed certificates."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ridedesk::auth_failed),
        help("Sign in again with: ridedesk login")
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(
        code(ridedesk::not_signed_in),
        help(
            "Sign in with: ridedesk login\n\
             Or pass a token with --token / RIDEDESK_TOKEN."
        )
    )]
    NotSignedIn,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ridedesk::not_found),
        help("Run: ridedesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' not found: the backend record was skipped ({reason})")]
    #[diagnostic(
        code(ridedesk::skipped_record),
        help("The record is inconsistent and cannot be acted on here; correct it on the backend.")
    )]
    SkippedRecord {
        resource_type: String,
        identifier: String,
        reason: String,
    },

    #[error("Booking {booking_id} cannot be {action}: it is {state}")]
    #[diagnostic(
        code(ridedesk::invalid_transition),
        help("Only bookings with a pending cancellation request can be approved or rejected.")
    )]
    InvalidTransition {
        booking_id: String,
        state: String,
        action: String,
    },

    #[error("{resource_type} '{identifier}' already has a request in flight")]
    #[diagnostic(
        code(ridedesk::busy),
        help("Wait for the pending request to finish, then retry.")
    )]
    Busy {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(ridedesk::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ridedesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ridedesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ridedesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(ridedesk::no_config),
        help(
            "Create a profile with: ridedesk config init\n\
             Or pass --backend / RIDEDESK_BACKEND.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ridedesk::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ridedesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {after:?}")]
    #[diagnostic(
        code(ridedesk::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { after: Duration },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(ridedesk::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(ridedesk::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotSignedIn => exit_code::AUTH,
            Self::NotFound { .. } | Self::SkippedRecord { .. } => exit_code::NOT_FOUND,
            Self::Busy { .. }
            | Self::ApiError {
                status: Some(409),
                ..
            } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidTransition { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. } | Self::NoConfig { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::ApiError { .. } | Self::Io(_) | Self::Render(_) | Self::Internal(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotAuthenticated => CliError::NotSignedIn,

            CoreError::ControllerDisconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                reason: "console session was closed".into(),
            },

            CoreError::Timeout { timeout } => CliError::Timeout { after: timeout },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{} list", list_command_for(&entity_type)),
                resource_type: entity_type.to_lowercase(),
                identifier,
            },

            CoreError::ValidationFailed { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::InvalidTransition {
                booking_id,
                state,
                action,
            } => CliError::InvalidTransition {
                booking_id,
                state,
                action: past_tense(&action),
            },

            CoreError::Busy {
                entity_type,
                identifier,
            } => CliError::Busy {
                resource_type: entity_type,
                identifier,
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::InvalidRecord {
                entity_type,
                identifier,
                reason,
            } => CliError::SkippedRecord {
                resource_type: entity_type.to_lowercase(),
                identifier,
                reason,
            },

            CoreError::Internal(reason) => CliError::Internal(reason),

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { .. } => CliError::NotSignedIn,
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

/// Subcommand that lists an entity family, for "not found" hints.
fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type.to_lowercase().as_str() {
        "user" => "users",
        "vehicle" | "fixed route" => "vehicles",
        "legal page" => "legal",
        _ => "bookings",
    }
}

fn past_tense(action: &str) -> String {
    match action {
        "approve" => "approved".into(),
        "reject" => "rejected".into(),
        other => other.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_family() {
        let validation: CliError = CoreError::ValidationFailed {
            field: "comment".into(),
            message: "must not be empty".into(),
        }
        .into();
        assert_eq!(validation.exit_code(), exit_code::USAGE);

        let gated: CliError = CoreError::InvalidTransition {
            booking_id: "b1".into(),
            state: "active".into(),
            action: "approve".into(),
        }
        .into();
        assert_eq!(gated.exit_code(), exit_code::USAGE);
        assert_eq!(
            gated.to_string(),
            "Booking b1 cannot be approved: it is active"
        );

        let busy: CliError = CoreError::Busy {
            entity_type: "booking".into(),
            identifier: "b1".into(),
        }
        .into();
        assert_eq!(busy.exit_code(), exit_code::CONFLICT);

        let auth: CliError = CoreError::NotAuthenticated.into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let timeout: CliError = CoreError::Timeout {
            timeout: Duration::from_millis(1500),
        }
        .into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
        assert_eq!(timeout.to_string(), "Request timed out after 1.5s");
    }

    #[test]
    fn skipped_record_carries_its_reason() {
        let err: CliError = CoreError::InvalidRecord {
            entity_type: "Booking".into(),
            identifier: "B2".into(),
            reason: "status COMPLETED cannot carry a pending cancellation request".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "booking 'B2' not found: the backend record was skipped \
             (status COMPLETED cannot carry a pending cancellation request)"
        );
    }

    #[test]
    fn not_found_points_at_the_right_listing() {
        let err: CliError = CoreError::NotFound {
            entity_type: "Legal page".into(),
            identifier: "p9".into(),
        }
        .into();
        match err {
            CliError::NotFound { list_command, .. } => assert_eq!(list_command, "legal list"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn remote_failures_are_general_errors() {
        let err: CliError = CoreError::Api {
            message: "boom".into(),
            status: Some(500),
        }
        .into();
        assert!(matches!(err, CliError::ApiError { status: Some(500), .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
