// ── Refund decisions ──
//
// Operator input for a pending cancellation is validated here, before the
// controller takes the in-flight guard or touches the network. A
// `CancellationDecision` can only be built from valid input.

use std::fmt;
use std::str::FromStr;

use ridedesk_api::models::HandleCancellationBody;
use serde::Serialize;

use crate::error::CoreError;
use crate::lifecycle::{BookingState, CancellationAction};
use crate::model::Booking;

/// Longest comment accepted by the decision dialog.
pub const MAX_COMMENT_CHARS: usize = 500;

// ── RefundAmount ────────────────────────────────────────────────────

/// Non-negative, finite monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RefundAmount(f64);

impl RefundAmount {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::validation(
                "refund amount",
                "must be a finite number",
            ));
        }
        if value < 0.0 {
            return Err(CoreError::validation(
                "refund amount",
                format!("must not be negative (got {value})"),
            ));
        }
        Ok(Self(value))
    }

    /// Parse operator text such as `"40"` or `" 12.50 "`.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("refund amount", "is required"));
        }
        let value: f64 = trimmed.parse().map_err(|_| {
            CoreError::validation("refund amount", format!("{trimmed:?} is not a number"))
        })?;
        Self::new(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for RefundAmount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RefundAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ── DecisionComment ─────────────────────────────────────────────────

/// Trimmed, non-empty comment of at most [`MAX_COMMENT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecisionComment(String);

impl DecisionComment {
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("comment", "must not be empty"));
        }
        let len = trimmed.chars().count();
        if len > MAX_COMMENT_CHARS {
            return Err(CoreError::validation(
                "comment",
                format!("is {len} characters, the limit is {MAX_COMMENT_CHARS}"),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── CancellationDecision ────────────────────────────────────────────

/// A validated operator decision on a pending customer cancellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationDecision {
    action: CancellationAction,
    refund: RefundAmount,
    comment: DecisionComment,
}

impl CancellationDecision {
    /// Approve with a refund typed by the operator.
    ///
    /// The comment is checked first, then the amount.
    pub fn approve(refund_text: &str, comment: &str) -> Result<Self, CoreError> {
        let comment = DecisionComment::parse(comment)?;
        let refund = RefundAmount::parse(refund_text)?;
        Ok(Self {
            action: CancellationAction::Approve,
            refund,
            comment,
        })
    }

    /// Approve with an already-numeric refund.
    pub fn approve_amount(refund: f64, comment: &str) -> Result<Self, CoreError> {
        let comment = DecisionComment::parse(comment)?;
        let refund = RefundAmount::new(refund)?;
        Ok(Self {
            action: CancellationAction::Approve,
            refund,
            comment,
        })
    }

    /// Reject. The refund is always zero and the booking's
    /// `refundedAmount` is left untouched by the backend.
    pub fn reject(comment: &str) -> Result<Self, CoreError> {
        Ok(Self {
            action: CancellationAction::Reject,
            refund: RefundAmount::ZERO,
            comment: DecisionComment::parse(comment)?,
        })
    }

    pub fn action(&self) -> CancellationAction {
        self.action
    }

    pub fn refund(&self) -> RefundAmount {
        self.refund
    }

    pub fn comment(&self) -> &str {
        self.comment.as_str()
    }

    /// Check the decision against the booking it targets.
    ///
    /// Returns the state the booking moves to. Fails when the booking has
    /// no pending cancellation request, or when an approved refund would
    /// exceed the booking's total price.
    pub fn check_against(&self, booking: &Booking) -> Result<BookingState, CoreError> {
        let next = booking
            .state
            .transition(self.action)
            .ok_or_else(|| CoreError::InvalidTransition {
                booking_id: booking.id.to_string(),
                state: booking.state.label().to_lowercase(),
                action: self.action.to_string(),
            })?;

        if let Some(total) = booking.pricing.total_price {
            if self.refund.value() > total {
                return Err(CoreError::validation(
                    "refund amount",
                    format!(
                        "{} exceeds the booking total of {total:.2}",
                        self.refund
                    ),
                ));
            }
        }

        Ok(next)
    }

    /// Request body for `POST /bookings/admin/{id}/handle-cancellation`.
    pub fn to_wire(&self) -> HandleCancellationBody {
        HandleCancellationBody {
            action: self.action.into(),
            refund_amount: self.refund.value(),
            rejection_or_approval_comments: self.comment.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ridedesk_api::models::DecisionAction;

    use super::*;
    use crate::model::{BookingStatus, CancellationStatus, EntityId, Pricing, TripDetails};

    fn booking(cancellation: Option<CancellationStatus>, total: Option<f64>) -> Booking {
        let status = BookingStatus::Pending;
        Booking {
            id: EntityId::from("B1"),
            customer: None,
            trip_date_time: None,
            created_at: None,
            status,
            cancellation_status: cancellation,
            state: BookingState::derive(status, cancellation).unwrap(),
            payment_status: None,
            payment_method: None,
            departure_location: "Airport".into(),
            destination_location: "Hotel".into(),
            pricing: Pricing {
                total_price: total,
                ..Pricing::default()
            },
            trip: TripDetails::default(),
        }
    }

    #[test]
    fn approve_requires_comment_for_any_amount() {
        for amount in ["0", "40", "100.5"] {
            for comment in ["", "   ", "\n\t"] {
                let err = CancellationDecision::approve(amount, comment).unwrap_err();
                assert!(err.is_validation(), "{amount:?}/{comment:?}: {err}");
            }
        }
    }

    #[test]
    fn approve_requires_non_negative_number() {
        for amount in ["-1", "abc", "", "NaN", "inf", "-0.01"] {
            let err = CancellationDecision::approve(amount, "valid reason").unwrap_err();
            assert!(
                matches!(err, CoreError::ValidationFailed { ref field, .. } if field == "refund amount"),
                "{amount:?} gave {err}"
            );
        }
        assert!(CancellationDecision::approve_amount(-1.0, "valid reason").is_err());
    }

    #[test]
    fn zero_refund_is_allowed() {
        let decision = CancellationDecision::approve("0", "goodwill only").unwrap();
        assert_eq!(decision.refund(), RefundAmount::ZERO);
    }

    #[test]
    fn reject_requires_comment() {
        assert!(CancellationDecision::reject("").unwrap_err().is_validation());
        assert!(CancellationDecision::reject("  ").unwrap_err().is_validation());
    }

    #[test]
    fn comment_length_limit() {
        let at_limit = "x".repeat(MAX_COMMENT_CHARS);
        assert!(CancellationDecision::reject(&at_limit).is_ok());

        let over = "é".repeat(MAX_COMMENT_CHARS + 1);
        assert!(CancellationDecision::reject(&over).unwrap_err().is_validation());
    }

    #[test]
    fn comment_is_trimmed() {
        let decision = CancellationDecision::reject("  insufficient notice \n").unwrap();
        assert_eq!(decision.comment(), "insufficient notice");
    }

    #[test]
    fn approve_wire_body() {
        let decision = CancellationDecision::approve("40", "customer request valid").unwrap();
        let body = decision.to_wire();
        assert_eq!(body.action, DecisionAction::Approve);
        assert_eq!(body.refund_amount, 40.0);
        assert_eq!(body.rejection_or_approval_comments, "customer request valid");
    }

    #[test]
    fn reject_wire_body_sends_zero_refund() {
        let body = CancellationDecision::reject("insufficient notice")
            .unwrap()
            .to_wire();
        assert_eq!(body.action, DecisionAction::Reject);
        assert_eq!(body.refund_amount, 0.0);
    }

    #[test]
    fn check_against_gates_on_pending_request() {
        let decision = CancellationDecision::approve("40", "ok").unwrap();

        let pending = booking(Some(CancellationStatus::Pending), Some(100.0));
        assert_eq!(
            decision.check_against(&pending).unwrap(),
            BookingState::CancelApproved
        );

        for other in [None, Some(CancellationStatus::Approved), Some(CancellationStatus::Rejected)] {
            let err = decision.check_against(&booking(other, Some(100.0))).unwrap_err();
            assert!(matches!(err, CoreError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn refund_cannot_exceed_total() {
        let pending = booking(Some(CancellationStatus::Pending), Some(100.0));

        let full = CancellationDecision::approve("100", "full refund").unwrap();
        assert!(full.check_against(&pending).is_ok());

        let over = CancellationDecision::approve("100.01", "too much").unwrap();
        assert!(over.check_against(&pending).unwrap_err().is_validation());

        let unknown_total = booking(Some(CancellationStatus::Pending), None);
        assert!(over.check_against(&unknown_total).is_ok());
    }
}
