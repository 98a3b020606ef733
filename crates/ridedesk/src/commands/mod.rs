//! Command dispatch and shared handler plumbing.

pub mod bookings;
pub mod config_cmd;
pub mod legal;
pub mod login;
pub mod users;
pub mod util;
pub mod vehicles;

use ridedesk_core::{ConsoleConfig, Controller};

use crate::cli::{
    BookingsArgs, BookingsCommand, Command, GlobalOpts, LegalArgs, LegalCommand, UsersCommand,
};
use crate::config::SessionMode;
use crate::error::CliError;

/// Local input checks. Runs before any configuration is resolved or
/// connection attempted, so a rejected command never reaches the backend.
pub fn validate(cmd: &Command) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => login::validate(args),
        Command::Users(args) => match &args.command {
            UsersCommand::List(_) => Ok(()),
            UsersCommand::Get { user }
            | UsersCommand::Suspend { user }
            | UsersCommand::Delete { user } => util::entity_id(user, "user").map(|_| ()),
        },
        Command::Bookings(args) => bookings::validate(&args.command),
        Command::Vehicles(args) => vehicles::validate(&args.command),
        Command::Legal(args) => legal::validate(&args.command),
        Command::Logout | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Whether the command reads the stored session token.
pub fn session_mode(cmd: &Command) -> SessionMode {
    match cmd {
        Command::Login(_)
        | Command::Legal(LegalArgs {
            command: LegalCommand::List { public: true, .. },
        }) => SessionMode::Anonymous,
        _ => SessionMode::Admin,
    }
}

/// Per-command adjustments to the resolved connection settings.
pub fn tune_config(cmd: &Command, config: &mut ConsoleConfig) {
    if let Command::Bookings(BookingsArgs {
        command: BookingsCommand::List(list),
    }) = cmd
    {
        bookings::apply_paging(list, config);
    }
}

/// Route a connected command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Login(args) => login::login(controller, args, global).await,
        Command::Users(args) => users::handle(controller, args, global).await,
        Command::Bookings(args) => bookings::handle(controller, args, global).await,
        Command::Vehicles(args) => vehicles::handle(controller, args, global).await,
        Command::Legal(args) => legal::handle(controller, args, global).await,
        Command::Logout | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command does not use a connection".into()))
        }
    };
    util::report_warnings(controller, global.quiet).await;
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["ridedesk"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn public_legal_listing_skips_the_token() {
        assert_eq!(
            session_mode(&parse(&["legal", "list", "--public"])),
            SessionMode::Anonymous
        );
        assert_eq!(session_mode(&parse(&["legal", "list"])), SessionMode::Admin);
        assert_eq!(session_mode(&parse(&["bookings", "list"])), SessionMode::Admin);
    }

    #[test]
    fn blank_ids_fail_validation() {
        assert!(validate(&parse(&["users", "delete", " "])).is_err());
        assert!(validate(&parse(&["users", "suspend", "u1"])).is_ok());
    }
}
