//! Session handlers: `login` and `logout`.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use ridedesk_core::Controller;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Password source for non-interactive sign-in.
const PASSWORD_ENV: &str = "RIDEDESK_PASSWORD";

pub fn validate(args: &LoginArgs) -> Result<(), CliError> {
    match args.email.as_deref() {
        Some(email) if !email.contains('@') => Err(CliError::Validation {
            field: "email".into(),
            reason: format!("{email:?} is not an e-mail address"),
        }),
        _ => Ok(()),
    }
}

fn prompt_email(default: Option<String>) -> Result<String, CliError> {
    if !std::io::stdin().is_terminal() {
        return default.ok_or_else(|| CliError::Validation {
            field: "email".into(),
            reason: "pass --email or set `email` in the profile".into(),
        });
    }
    let mut input = Input::<String>::new().with_prompt("Admin e-mail");
    if let Some(email) = default {
        input = input.default(email);
    }
    input.interact_text().map_err(|e| CliError::Validation {
        field: "email".into(),
        reason: format!("prompt failed: {e}"),
    })
}

fn read_password() -> Result<SecretString, CliError> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(p) => p,
        Err(_) => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

/// Sign in and keep the issued token in the system keyring.
pub async fn login(
    controller: &Controller,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile_email = cfg.profiles.get(&profile_name).and_then(|p| p.email.clone());

    let email = match args.email {
        Some(email) => email,
        None => prompt_email(profile_email)?,
    };
    let password = read_password()?;

    let token = controller.sign_in(email.trim(), &password).await?;

    if args.print_token {
        println!("{}", token.expose_secret());
        return Ok(());
    }

    ridedesk_config::store_token(&profile_name, &token)?;
    output::notice(
        &format!("✓ Signed in as {email}; token stored for profile '{profile_name}'"),
        global.quiet,
    );
    Ok(())
}

/// Forget the stored token. No backend call is made.
pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    let message = if ridedesk_config::clear_token(&profile_name)? {
        format!("✓ Signed out of profile '{profile_name}'")
    } else {
        format!("No stored token for profile '{profile_name}'")
    };
    output::notice(&message, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_flag_must_look_like_an_address() {
        let bad = LoginArgs {
            email: Some("ops".into()),
            print_token: false,
        };
        assert!(validate(&bad).is_err());

        let good = LoginArgs {
            email: Some("ops@example.com".into()),
            print_token: true,
        };
        assert!(validate(&good).is_ok());
        assert!(validate(&LoginArgs { email: None, print_token: false }).is_ok());
    }
}
