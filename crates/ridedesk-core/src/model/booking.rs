// ── Bookings ──
//
// A booking's lifecycle is carried by two independent backend fields,
// `status` and `cancellationStatus`. Both are kept verbatim for display;
// `state` is the validated combination (see `crate::lifecycle`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::{EntityId, Keyed};
use crate::lifecycle::BookingState;

/// Execution state of the trip itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Completed,
    Cancelled,
}

/// Customer cancellation request sub-status. Absent (`null`) when the
/// customer never asked to cancel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// Denormalized customer snapshot taken at booking time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Monetary amounts, all in the booking currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// `None` when the backend did not report a total.
    pub total_price: Option<f64>,
    pub language_fee: f64,
    pub welcome_sign_fee: f64,
    pub refunded_amount: f64,
}

/// Trip attributes chosen by the customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct TripDetails {
    pub flight_number: Option<String>,
    pub driver_language: Option<String>,
    pub vehicle_type: Option<String>,
    pub distance: Option<f64>,
    pub time: Option<f64>,
    pub passengers: u32,
    pub bags: u32,
    pub pets: u32,
    pub strollers: u32,
    pub wheelchair: bool,
    pub booster_seat: bool,
    pub child_seat: bool,
    pub welcome_sign: bool,
    pub specific_language: bool,
    pub special_instructions: Option<String>,
    pub cancellation_reason: Option<String>,
}

/// One reserved trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: EntityId,
    /// `None` when the backend no longer carries the customer snapshot.
    pub customer: Option<Customer>,
    pub trip_date_time: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub cancellation_status: Option<CancellationStatus>,
    pub state: BookingState,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<String>,
    pub departure_location: String,
    pub destination_location: String,
    pub pricing: Pricing,
    pub trip: TripDetails,
}

impl Booking {
    pub fn customer_name(&self) -> String {
        self.customer
            .as_ref()
            .map(Customer::full_name)
            .unwrap_or_default()
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .map(|c| c.email.as_str())
            .filter(|e| !e.trim().is_empty())
    }

    /// `"{departure} → {destination}"`
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.departure_location, self.destination_location)
    }
}

impl Keyed for Booking {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_match_backend() {
        assert_eq!(BookingStatus::Cancelled.to_string(), "CANCELLED");
        assert_eq!("completed".parse::<BookingStatus>().ok(), Some(BookingStatus::Completed));
        assert_eq!(
            "APPROVED".parse::<CancellationStatus>().ok(),
            Some(CancellationStatus::Approved)
        );
        assert!("REFUNDED".parse::<CancellationStatus>().is_err());
        assert_eq!(PaymentStatus::Unpaid.as_ref(), "UNPAID");
    }

    #[test]
    fn customer_name_trims_missing_parts() {
        let customer = Customer {
            first_name: "Ana".into(),
            ..Customer::default()
        };
        assert_eq!(customer.full_name(), "Ana");
    }
}
