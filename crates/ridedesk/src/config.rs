//! CLI configuration -- thin wrapper around `ridedesk_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--backend, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use ridedesk_config::ConfigError;
use ridedesk_core::{AuthCredentials, ConsoleConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ridedesk_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Session requirement of the command being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Use the stored or supplied bearer token.
    Admin,
    /// Public endpoints only; never read a token.
    Anonymous,
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI overrides.
pub fn build_console_config(
    global: &GlobalOpts,
    mode: SessionMode,
) -> Result<ConsoleConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global, mode);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    // No profile -- build from CLI flags / env vars alone
    let backend = global.backend.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    resolve_profile(
        &Profile::new(backend),
        &profile_name,
        &cfg.defaults,
        global,
        mode,
    )
}

/// Translate a `Profile` + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
    mode: SessionMode,
) -> Result<ConsoleConfig, CliError> {
    // 1. Backend URL (flag > env > profile)
    let url = backend_url(profile, global)?;

    // 2. Session token (flag > profile token_env > keyring > plaintext)
    let auth = match mode {
        SessionMode::Anonymous => AuthCredentials::Anonymous,
        SessionMode::Admin => match resolve_token_with_flag(profile, profile_name, global) {
            Ok(token) => AuthCredentials::Token(token),
            // Admin calls then fail locally with "not signed in".
            Err(ConfigError::NoCredentials { .. }) => AuthCredentials::Anonymous,
            Err(e) => return Err(e.into()),
        },
    };

    let mut config = ConsoleConfig::new(url, auth);

    // 3. TLS verification
    config.tls = ridedesk_config::tls_for(profile, global.insecure || defaults.insecure);

    // 4. Timeout (flag > profile > defaults)
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    // 5. Bookings page size
    config.booking_page_size = profile.page_size.unwrap_or(defaults.page_size);

    Ok(config)
}

/// Backend URL from `--backend` when given, else the profile.
pub fn backend_url(profile: &Profile, global: &GlobalOpts) -> Result<Url, CliError> {
    let url = match global.backend.as_deref() {
        Some(raw) => ridedesk_config::parse_backend(raw)?,
        None => profile.backend_url()?,
    };
    Ok(url)
}

/// Resolve the token with the CLI flag override, then fall through to
/// shared resolution.
fn resolve_token_with_flag(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, ConfigError> {
    if let Some(token) = global.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(SecretString::from(token.to_owned()));
    }
    ridedesk_config::resolve_token(profile, profile_name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["ridedesk"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "show"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile_values() {
        let mut profile = Profile::new("https://api.example.com");
        profile.timeout = Some(60);
        profile.page_size = Some(50);
        let opts = global(&[
            "--backend",
            "http://localhost:4000/api",
            "--token",
            "abc",
            "--timeout",
            "5",
            "-k",
        ]);

        let config = resolve_profile(
            &profile,
            "default",
            &Defaults::default(),
            &opts,
            SessionMode::Admin,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:4000/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.booking_page_size, 50);
        assert_eq!(
            config.tls,
            ridedesk_core::TlsVerification::DangerAcceptInvalid
        );
        match config.auth {
            AuthCredentials::Token(token) => assert_eq!(token.expose_secret(), "abc"),
            other => panic!("expected token auth, got {other:?}"),
        }
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let mut profile = Profile::new("https://api.example.com");
        profile.timeout = Some(60);
        let opts = global(&[]);

        let config = resolve_profile(
            &profile,
            "default",
            &Defaults::default(),
            &opts,
            SessionMode::Anonymous,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(matches!(config.auth, AuthCredentials::Anonymous));
    }

    #[test]
    fn invalid_backend_flag_is_a_validation_error() {
        let opts = global(&["--backend", "ftp://example.com"]);
        let err = backend_url(&Profile::new("https://api.example.com"), &opts).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
