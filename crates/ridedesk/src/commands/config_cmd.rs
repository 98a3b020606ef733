//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "page_size = {}", cfg.defaults.page_size);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "backend = \"{}\"", p.backend);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"{MASK}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(page_size) = p.page_size {
            let _ = writeln!(out, "page_size = {page_size}");
        }
    }

    out.trim_end().to_owned()
}

/// Serializable view of the config with plaintext tokens masked, for the
/// structured output formats.
fn redacted_value(cfg: &Config) -> Result<serde_json::Value, CliError> {
    let mut value = serde_json::to_value(cfg).map_err(|e| CliError::Render(e.to_string()))?;
    if let Some(profiles) = value
        .get_mut("profiles")
        .and_then(serde_json::Value::as_object_mut)
    {
        for profile in profiles.values_mut() {
            if let Some(token) = profile.get_mut("token").filter(|t| !t.is_null()) {
                *token = serde_json::Value::String(MASK.into());
            }
        }
    }
    Ok(value)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: hint.into(),
    })
}

/// Apply one `config set` key to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "backend" => {
            ridedesk_config::parse_backend(&value)?;
            profile.backend = value;
        }
        "email" => profile.email = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(parse_value("insecure", &value, "must be 'true' or 'false'")?);
        }
        "timeout" => {
            profile.timeout = Some(parse_value("timeout", &value, "must be a number (seconds)")?);
        }
        "page_size" | "page-size" => {
            let size: u32 = parse_value("page_size", &value, "must be a positive number")?;
            if size == 0 {
                return Err(CliError::Validation {
                    field: "page_size".into(),
                    reason: "must be a positive number".into(),
                });
            }
            profile.page_size = Some(size);
        }
        "token" => {
            return Err(CliError::Validation {
                field: "token".into(),
                reason: "tokens are not set by hand; run `ridedesk login` to store one in the \
                         system keyring, or point token_env at an environment variable"
                    .into(),
            });
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: backend, email, token_env, \
                     ca_cert, insecure, timeout, page_size"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ridedesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let backend: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:4000".into())
                .validate_with(|input: &String| {
                    ridedesk_config::parse_backend(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Admin e-mail (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile::new(backend);
            profile.email = Some(email).filter(|e| !e.trim().is_empty());

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Sign in with: ridedesk login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let view = redacted_value(&cfg)?;
            let out = output::render_single(
                &global.output,
                &view,
                |_| format_config_redacted(&cfg),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::notice(&format!("✓ Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: ridedesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with_token() -> Config {
        let mut profile = Profile::new("https://api.example.com");
        profile.token = Some("secret-token".into());
        profile.email = Some("ops@example.com".into());
        let mut cfg = Config::default();
        cfg.profiles.insert("prod".into(), profile);
        cfg
    }

    #[test]
    fn show_masks_tokens_in_every_format() {
        let cfg = config_with_token();

        let text = format_config_redacted(&cfg);
        assert!(text.contains("token = \"****\""));
        assert!(!text.contains("secret-token"));

        let value = redacted_value(&cfg).unwrap();
        assert_eq!(value["profiles"]["prod"]["token"], "****");
        assert!(!value.to_string().contains("secret-token"));
    }

    #[test]
    fn set_validates_values() {
        let mut profile = Profile::new("https://api.example.com");
        set_profile_key(&mut profile, "timeout", "10".into()).unwrap();
        assert_eq!(profile.timeout, Some(10));

        assert!(set_profile_key(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_profile_key(&mut profile, "backend", "not a url".into()).is_err());
        assert!(set_profile_key(&mut profile, "page_size", "0".into()).is_err());
        assert!(set_profile_key(&mut profile, "token", "abc".into()).is_err());
        assert!(set_profile_key(&mut profile, "colour", "red".into()).is_err());
    }
}
