//! Shared helpers for command handlers.

use std::io::IsTerminal;

use ridedesk_core::{Controller, EntityId};

use crate::cli::SearchArgs;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Reject blank identifiers before anything is sent.
pub fn entity_id(raw: &str, field: &str) -> Result<EntityId, CliError> {
    let id = EntityId::from(raw.trim());
    if id.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(id)
}

pub fn query(args: &SearchArgs) -> ridedesk_core::SearchQuery {
    args.search.as_deref().into()
}

/// Print warnings the controller collected (skipped records, failed
/// follow-up refreshes).
pub async fn report_warnings(controller: &Controller, quiet: bool) {
    for warning in controller.take_warnings().await {
        output::notice(&format!("warning: {warning}"), quiet);
    }
}
