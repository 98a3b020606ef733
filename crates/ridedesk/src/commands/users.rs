//! User command handlers.

use std::sync::Arc;

use tabled::Tabled;

use ridedesk_core::{Command as CoreCommand, Controller, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Joined")]
    joined: String,
}

impl UserRow {
    fn new(u: &Arc<User>, color: bool) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.full_name(),
            email: u.email.clone(),
            phone: output::or_dash(&u.phone).to_owned(),
            status: output::active_label(u.is_active, color),
            joined: output::fmt_time(u.created_at),
        }
    }
}

fn detail(u: &Arc<User>) -> String {
    [
        format!("ID:      {}", u.id),
        format!("Name:    {}", output::or_dash(&u.full_name())),
        format!("Email:   {}", output::or_dash(&u.email)),
        format!("Phone:   {}", output::or_dash(&u.phone)),
        format!("Status:  {}", output::active_label(u.is_active, false)),
        format!("Joined:  {}", output::fmt_time(u.created_at)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        UsersCommand::List(search) => {
            controller.refresh_users().await?;
            let users = controller.users(&util::query(&search));
            let out = output::render_list(
                &global.output,
                &users,
                |u| UserRow::new(u, color),
                |u| u.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { user } => {
            let id = util::entity_id(&user, "user")?;
            controller.refresh_users().await?;
            let found = controller.user(&id).ok_or_else(|| not_found(user))?;
            let out = output::render_single(&global.output, &found, detail, |u| u.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Suspend { user } => {
            let id = util::entity_id(&user, "user")?;
            controller
                .execute(CoreCommand::SuspendUser { id: id.clone() })
                .await?;
            // The endpoint toggles; report what the refreshed list says.
            let message = match controller.user(&id) {
                Some(u) if u.is_active => format!("User {id} is active"),
                Some(_) => format!("User {id} suspended"),
                None => format!("Suspension toggled for user {id}"),
            };
            output::notice(&message, global.quiet);
            Ok(())
        }

        UsersCommand::Delete { user } => {
            let id = util::entity_id(&user, "user")?;
            if !util::confirm(
                &format!("Delete user {id}? This cannot be undone."),
                "users delete",
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteUser { id: id.clone() })
                .await?;
            output::notice(&format!("User {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

fn not_found(identifier: String) -> CliError {
    CliError::NotFound {
        resource_type: "user".into(),
        identifier,
        list_command: "users list".into(),
    }
}
