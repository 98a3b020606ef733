// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller validates each command locally, takes the in-flight guard
// for the target entity, issues one backend call, and re-fetches the
// affected list.

pub mod requests;

use crate::model::{EntityId, FixedRoute, LegalPage, Vehicle};
use crate::refund::CancellationDecision;

pub use requests::{
    CreateVehicleRequest, CustomerEmailRequest, LegalPageRequest, UpdateRoutePriceRequest,
    UpdateVehicleRequest,
};

/// All write operations against the booking backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Users ────────────────────────────────────────────────────────
    SuspendUser {
        id: EntityId,
    },
    DeleteUser {
        id: EntityId,
    },

    // ── Bookings ─────────────────────────────────────────────────────
    DecideCancellation {
        booking_id: EntityId,
        decision: CancellationDecision,
    },
    SendCustomerEmail {
        booking_id: EntityId,
        request: CustomerEmailRequest,
    },

    // ── Vehicles ─────────────────────────────────────────────────────
    CreateVehicle(CreateVehicleRequest),
    UpdateVehicle {
        id: EntityId,
        request: UpdateVehicleRequest,
    },
    UpdateRoutePrice {
        route_id: EntityId,
        request: UpdateRoutePriceRequest,
    },

    // ── Legal pages ──────────────────────────────────────────────────
    CreateLegalPage(LegalPageRequest),
    UpdateLegalPage {
        id: EntityId,
        request: LegalPageRequest,
    },
}

impl Command {
    /// Short verb for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SuspendUser { .. } => "suspend user",
            Self::DeleteUser { .. } => "delete user",
            Self::DecideCancellation { .. } => "decide cancellation",
            Self::SendCustomerEmail { .. } => "send customer e-mail",
            Self::CreateVehicle(_) => "create vehicle",
            Self::UpdateVehicle { .. } => "update vehicle",
            Self::UpdateRoutePrice { .. } => "update route price",
            Self::CreateLegalPage(_) => "create legal page",
            Self::UpdateLegalPage { .. } => "update legal page",
        }
    }
}

/// Result of a command execution.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Vehicle(Vehicle),
    Route(FixedRoute),
    LegalPage(LegalPage),
}
