// ── Booking lifecycle ──
//
// The backend stores a booking's lifecycle as two independent strings.
// `BookingState` is their validated combination: illegal pairs cannot be
// constructed, and the operator actions on offer are a pure function of
// the state.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

use crate::model::{BookingStatus, CancellationStatus};

/// Derived lifecycle state of a booking.
///
/// | `status`    | `cancellationStatus` | state              |
/// |-------------|----------------------|--------------------|
/// | `PENDING`   | `null`               | `Active`           |
/// | any but `COMPLETED`/`CANCELLED` | `PENDING` | `CancelRequested` |
/// | any         | `APPROVED`           | `CancelApproved`   |
/// | any         | `REJECTED`           | `CancelRejected`   |
/// | `COMPLETED` | `null`               | `Completed`        |
/// | `CANCELLED` | `null`               | `Cancelled`        |
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    Active,
    CancelRequested,
    CancelApproved,
    CancelRejected,
    Completed,
    Cancelled,
}

/// The `(status, cancellationStatus)` pair is not a legal booking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("status {status} cannot carry a pending cancellation request")]
pub struct IllegalState {
    pub status: BookingStatus,
}

/// Operator decision kinds accepted by the cancellation endpoint.
///
/// Only approve and reject exist: an operator-initiated unconditional
/// cancel is not part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CancellationAction {
    Approve,
    Reject,
}

/// Actions the console offers for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum BookingAction {
    ApproveCancellation,
    RejectCancellation,
    EmailCustomer,
}

impl BookingState {
    /// Validating constructor.
    ///
    /// A pending cancellation takes precedence over `status`, except on a
    /// trip that already completed or was cancelled, which is rejected.
    pub fn derive(
        status: BookingStatus,
        cancellation: Option<CancellationStatus>,
    ) -> Result<Self, IllegalState> {
        match (status, cancellation) {
            (BookingStatus::Completed | BookingStatus::Cancelled, Some(CancellationStatus::Pending)) => {
                Err(IllegalState { status })
            }
            (BookingStatus::Pending, Some(CancellationStatus::Pending)) => Ok(Self::CancelRequested),
            (_, Some(CancellationStatus::Approved)) => Ok(Self::CancelApproved),
            (_, Some(CancellationStatus::Rejected)) => Ok(Self::CancelRejected),
            (BookingStatus::Pending, None) => Ok(Self::Active),
            (BookingStatus::Completed, None) => Ok(Self::Completed),
            (BookingStatus::Cancelled, None) => Ok(Self::Cancelled),
        }
    }

    /// Operator actions available in this state. Approve and reject are
    /// offered only while a customer cancellation request is pending.
    pub fn available_actions(self) -> &'static [BookingAction] {
        match self {
            Self::CancelRequested => &[
                BookingAction::ApproveCancellation,
                BookingAction::RejectCancellation,
                BookingAction::EmailCustomer,
            ],
            Self::Active
            | Self::CancelApproved
            | Self::CancelRejected
            | Self::Completed
            | Self::Cancelled => &[BookingAction::EmailCustomer],
        }
    }

    pub fn allows(self, action: BookingAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// Transition table. Returns `None` for every pair outside
    /// `CancelRequested × {Approve, Reject}`.
    pub fn transition(self, action: CancellationAction) -> Option<Self> {
        match (self, action) {
            (Self::CancelRequested, CancellationAction::Approve) => Some(Self::CancelApproved),
            (Self::CancelRequested, CancellationAction::Reject) => Some(Self::CancelRejected),
            (
                Self::Active
                | Self::CancelApproved
                | Self::CancelRejected
                | Self::Completed
                | Self::Cancelled,
                CancellationAction::Approve | CancellationAction::Reject,
            ) => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        match self {
            Self::Active | Self::CancelRequested => false,
            Self::CancelApproved | Self::CancelRejected | Self::Completed | Self::Cancelled => true,
        }
    }

    /// Human label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::CancelRequested => "Cancellation requested",
            Self::CancelApproved => "Cancellation approved",
            Self::CancelRejected => "Cancellation rejected",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl From<CancellationAction> for BookingAction {
    fn from(action: CancellationAction) -> Self {
        match action {
            CancellationAction::Approve => Self::ApproveCancellation,
            CancellationAction::Reject => Self::RejectCancellation,
        }
    }
}

impl From<CancellationAction> for ridedesk_api::models::DecisionAction {
    fn from(action: CancellationAction) -> Self {
        match action {
            CancellationAction::Approve => Self::Approve,
            CancellationAction::Reject => Self::Reject,
        }
    }
}
