//! Booking command handlers, including cancellation decisions.

use std::sync::Arc;

use tabled::Tabled;

use ridedesk_core::{
    Booking, BookingState, CancellationAction, CancellationDecision, Command as CoreCommand,
    ConsoleConfig, Controller, CustomerEmailRequest, EntityId,
};

use crate::cli::{BookingListArgs, BookingsArgs, BookingsCommand, GlobalOpts, StateFilter};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Trip")]
    trip: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Refunded")]
    refunded: String,
    #[tabled(rename = "State")]
    state: String,
}

impl BookingRow {
    fn new(b: &Arc<Booking>, color: bool) -> Self {
        Self {
            id: b.id.to_string(),
            trip: output::fmt_time(b.trip_date_time),
            customer: output::or_dash(&b.customer_name()).to_owned(),
            route: b.route_label(),
            total: output::fmt_money(b.pricing.total_price),
            refunded: output::fmt_money(Some(b.pricing.refunded_amount)),
            state: output::state_label(b.state, color),
        }
    }
}

fn detail(b: &Arc<Booking>) -> String {
    let mut lines = vec![
        format!("ID:           {}", b.id),
        format!("State:        {}", b.state.label()),
        format!("Status:       {}", b.status),
        format!(
            "Cancellation: {}",
            b.cancellation_status
                .map_or_else(|| "-".into(), |c| c.to_string())
        ),
        format!("Trip:         {}", output::fmt_time(b.trip_date_time)),
        format!("Booked:       {}", output::fmt_time(b.created_at)),
        format!("From:         {}", output::or_dash(&b.departure_location)),
        format!("To:           {}", output::or_dash(&b.destination_location)),
    ];

    if let Some(c) = &b.customer {
        lines.push(format!("Customer:     {}", output::or_dash(&c.full_name())));
        lines.push(format!("Email:        {}", output::or_dash(&c.email)));
        lines.push(format!("Phone:        {}", output::or_dash(&c.phone)));
    }

    lines.push(format!("Total:        {}", output::fmt_money(b.pricing.total_price)));
    lines.push(format!(
        "Refunded:     {}",
        output::fmt_money(Some(b.pricing.refunded_amount))
    ));
    if let Some(p) = b.payment_status {
        lines.push(format!("Payment:      {p}"));
    }
    if let Some(v) = &b.trip.vehicle_type {
        lines.push(format!("Vehicle:      {v}"));
    }
    if let Some(f) = &b.trip.flight_number {
        lines.push(format!("Flight:       {f}"));
    }
    lines.push(format!(
        "Passengers:   {} ({} bags)",
        b.trip.passengers, b.trip.bags
    ));
    if let Some(reason) = &b.trip.cancellation_reason {
        lines.push(format!("Reason:       {reason}"));
    }

    let actions: Vec<&str> = b
        .state
        .available_actions()
        .iter()
        .map(AsRef::as_ref)
        .collect();
    lines.push(format!("Actions:      {}", actions.join(", ")));
    lines.join("\n")
}

impl From<StateFilter> for BookingState {
    fn from(s: StateFilter) -> Self {
        match s {
            StateFilter::Active => Self::Active,
            StateFilter::CancelRequested => Self::CancelRequested,
            StateFilter::CancelApproved => Self::CancelApproved,
            StateFilter::CancelRejected => Self::CancelRejected,
            StateFilter::Completed => Self::Completed,
            StateFilter::Cancelled => Self::Cancelled,
        }
    }
}

// ── Local checks ────────────────────────────────────────────────────

/// Input checks that need no backend data.
pub fn validate(cmd: &BookingsCommand) -> Result<(), CliError> {
    match cmd {
        BookingsCommand::List(args) => {
            if args.limit == Some(0) || args.page == Some(0) {
                return Err(CliError::Validation {
                    field: "page".into(),
                    reason: "page and limit start at 1".into(),
                });
            }
        }
        BookingsCommand::Get { booking } => {
            util::entity_id(booking, "booking")?;
        }
        BookingsCommand::Approve {
            booking,
            refund,
            comment,
        } => {
            util::entity_id(booking, "booking")?;
            CancellationDecision::approve(refund, comment)?;
        }
        BookingsCommand::Reject { booking, comment } => {
            util::entity_id(booking, "booking")?;
            CancellationDecision::reject(comment)?;
        }
        BookingsCommand::Email {
            booking,
            subject,
            message,
        } => {
            util::entity_id(booking, "booking")?;
            for (field, value) in [("subject", subject), ("message", message)] {
                if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    return Err(CliError::Validation {
                        field: field.into(),
                        reason: "must not be empty".into(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// `--page` / `--limit` select the bookings page fetched on refresh.
pub fn apply_paging(args: &BookingListArgs, config: &mut ConsoleConfig) {
    if let Some(page) = args.page {
        config.booking_page = page;
    }
    if let Some(limit) = args.limit {
        config.booking_page_size = limit;
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: BookingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        BookingsCommand::List(list) => {
            controller.refresh_bookings().await?;
            let query = util::query(&list.search);
            let bookings = match list.state {
                Some(state) => controller.bookings_in_state(&query, state.into()),
                None => controller.bookings(&query),
            };
            let out = output::render_list(
                &global.output,
                &bookings,
                |b| BookingRow::new(b, color),
                |b| b.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Get { booking } => {
            let id = util::entity_id(&booking, "booking")?;
            let found = load(controller, &id).await?;
            let out = output::render_single(&global.output, &found, detail, |b| b.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Approve {
            booking,
            refund,
            comment,
        } => {
            let id = util::entity_id(&booking, "booking")?;
            let decision = CancellationDecision::approve(&refund, &comment)?;
            let target = load(controller, &id).await?;
            decision.check_against(&target)?;

            let prompt = format!(
                "Approve cancellation of {} for {} and refund {}?",
                id,
                output::or_dash(&target.customer_name()),
                decision.refund()
            );
            if !util::confirm(&prompt, "bookings approve", global.yes)? {
                return Ok(());
            }
            decide(controller, id, decision, global).await
        }

        BookingsCommand::Reject { booking, comment } => {
            let id = util::entity_id(&booking, "booking")?;
            let decision = CancellationDecision::reject(&comment)?;
            let target = load(controller, &id).await?;
            decision.check_against(&target)?;

            let prompt = format!(
                "Reject cancellation request of {} for {}?",
                id,
                output::or_dash(&target.customer_name())
            );
            if !util::confirm(&prompt, "bookings reject", global.yes)? {
                return Ok(());
            }
            decide(controller, id, decision, global).await
        }

        BookingsCommand::Email {
            booking,
            subject,
            message,
        } => {
            let id = util::entity_id(&booking, "booking")?;
            let target = load(controller, &id).await?;
            let request = CustomerEmailRequest::for_booking(&target, subject, message)?;
            let to = request.email.clone();
            controller
                .execute(CoreCommand::SendCustomerEmail {
                    booking_id: id,
                    request,
                })
                .await?;
            output::notice(&format!("E-mail sent to {to}"), global.quiet);
            Ok(())
        }
    }
}

/// Submit a decision and print the booking as re-fetched afterwards.
async fn decide(
    controller: &Controller,
    id: EntityId,
    decision: CancellationDecision,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let verb = match decision.action() {
        CancellationAction::Approve => "approval",
        CancellationAction::Reject => "rejection",
    };
    controller
        .execute(CoreCommand::DecideCancellation {
            booking_id: id.clone(),
            decision,
        })
        .await?;

    let state = controller
        .booking(&id)
        .map_or_else(|| "updated".into(), |b| b.state.label().to_lowercase());
    output::notice(
        &format!("Cancellation {verb} recorded for booking {id}: {state}"),
        global.quiet,
    );
    Ok(())
}

/// Refresh and look up one booking. A booking the refresh skipped as
/// inconsistent is reported with the reason it was skipped.
async fn load(controller: &Controller, id: &EntityId) -> Result<Arc<Booking>, CliError> {
    controller.refresh_bookings().await?;
    if let Some(booking) = controller.booking(id) {
        return Ok(booking);
    }
    Err(match controller.rejected_booking(id).await {
        Some(reason) => CliError::SkippedRecord {
            resource_type: "booking".into(),
            identifier: id.to_string(),
            reason,
        },
        None => CliError::NotFound {
            resource_type: "booking".into(),
            identifier: id.to_string(),
            list_command: "bookings list".into(),
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};
    use crate::error::exit_code;

    fn bookings_cmd(args: &[&str]) -> BookingsCommand {
        let mut argv = vec!["ridedesk", "bookings"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Bookings(b) => b.command,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn approve_requires_a_comment() {
        let cmd = bookings_cmd(&["approve", "b1", "--refund", "40", "--comment", "   "]);
        let err = validate(&cmd).unwrap_err();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("comment"));
    }

    #[test]
    fn approve_rejects_bad_refunds() {
        for refund in ["abc", "-5", "", "NaN"] {
            let cmd = bookings_cmd(&["approve", "b1", "--refund", refund, "--comment", "ok"]);
            let err = validate(&cmd).unwrap_err();
            assert!(
                matches!(err, CliError::Validation { ref field, .. } if field == "refund amount"),
                "refund {refund:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn valid_decisions_pass() {
        let approve = bookings_cmd(&["approve", "b1", "--refund", "40", "--comment", "ok"]);
        assert!(validate(&approve).is_ok());
        let reject = bookings_cmd(&["reject", "b1", "--comment", "too late"]);
        assert!(validate(&reject).is_ok());
    }

    #[test]
    fn blank_email_subject_is_rejected() {
        let cmd = bookings_cmd(&["email", "b1", "--subject", " "]);
        assert!(validate(&cmd).is_err());
        assert!(validate(&bookings_cmd(&["email", "b1"])).is_ok());
    }

    #[test]
    fn paging_flags_override_config() {
        let BookingsCommand::List(args) = bookings_cmd(&["list", "--page", "2", "--limit", "50"])
        else {
            panic!("expected list");
        };
        let mut config = ConsoleConfig::new(
            "https://api.example.com".parse().unwrap(),
            ridedesk_core::AuthCredentials::Anonymous,
        );
        apply_paging(&args, &mut config);
        assert_eq!(config.booking_page, 2);
        assert_eq!(config.booking_page_size, 50);
    }
}
