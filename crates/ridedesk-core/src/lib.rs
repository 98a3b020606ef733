//! Domain layer between `ridedesk-api` and the command-line front end.
//!
//! This crate owns the business rules of the booking admin console:
//!
//! - **[`Controller`]**: Central facade. [`connect()`](Controller::connect)
//!   establishes the bearer session, `refresh_*` methods rebuild the
//!   canonical lists, and [`execute()`](Controller::execute) routes typed
//!   [`Command`]s to the backend. [`Controller::oneshot()`] wraps a single
//!   CLI invocation.
//!
//! - **[`lifecycle`]**: The booking state machine. A [`BookingState`] is
//!   derived from the `(status, cancellationStatus)` pair by a validating
//!   constructor; only a pending customer cancellation exposes the
//!   approve/reject actions.
//!
//! - **[`refund`]**: Operator decisions on pending cancellations. Input is
//!   validated locally into a [`CancellationDecision`] before any request is
//!   issued.
//!
//! - **[`filter`]**: Pure, non-destructive search projections over the
//!   canonical lists held by the [`DataStore`].

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod model;
pub mod refund;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, ConsoleConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use filter::{SearchQuery, Searchable};
pub use lifecycle::{BookingAction, BookingState, CancellationAction};
pub use refund::{CancellationDecision, DecisionComment, RefundAmount};
pub use store::DataStore;

pub use model::{
    Booking, BookingStatus, CancellationStatus, Customer, EntityId, FixedRoute, FleetSummary,
    LegalPage, LegalPageKind, PaymentStatus, Pricing, TripDetails, User, Vehicle,
};
