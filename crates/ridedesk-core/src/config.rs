// ── Runtime connection configuration ──
//
// These types describe *how* to reach the booking backend. They carry
// credential data and connection tuning, but never touch disk. The CLI
// constructs a `ConsoleConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default booking page requested from `/bookings/admin/all`.
pub const DEFAULT_BOOKING_PAGE_SIZE: u32 = 500;

/// How to authenticate with the backend.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// A bearer token from a previous sign-in.
    Token(SecretString),
    /// Sign in with email and password on connect.
    Credentials {
        email: String,
        password: SecretString,
    },
    /// No session; only public endpoints (legal pages) are usable.
    Anonymous,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one console session against one backend.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL (e.g., `https://api.example.com`).
    pub base_url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Per-request timeout. Elapsed requests fail as remote errors.
    pub timeout: Duration,
    /// Bookings page and page size fetched on refresh.
    pub booking_page: u32,
    pub booking_page_size: u32,
}

impl ConsoleConfig {
    pub fn new(base_url: Url, auth: AuthCredentials) -> Self {
        Self {
            base_url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            booking_page: 1,
            booking_page_size: DEFAULT_BOOKING_PAGE_SIZE,
        }
    }
}
