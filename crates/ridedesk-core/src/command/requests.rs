// ── Typed request structs for Command payloads ──
//
// Each request validates locally with `validate()` before the controller
// issues anything, and converts into its wire body with `to_wire()`.

use serde::{Deserialize, Serialize};

use ridedesk_api::models::{
    CreateVehicleBody, CustomerEmailBody, LegalPageBody, UpdateRouteBody, UpdateVehicleBody,
};

use crate::error::CoreError;
use crate::model::Booking;

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_price(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::validation(
            field,
            format!("must be a non-negative number (got {value})"),
        ));
    }
    Ok(())
}

// ── Vehicles ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    pub vehicle_type: String,
    pub price: f64,
}

impl CreateVehicleRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("vehicle type", &self.vehicle_type)?;
        require_price("price", self.price)
    }

    pub(crate) fn to_wire(&self) -> CreateVehicleBody {
        CreateVehicleBody {
            vehicle_type: self.vehicle_type.trim().to_owned(),
            price: self.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVehicleRequest {
    pub price: f64,
    pub price_per_km: f64,
}

impl UpdateVehicleRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_price("price", self.price)?;
        require_price("price per km", self.price_per_km)
    }

    pub(crate) fn to_wire(&self) -> UpdateVehicleBody {
        UpdateVehicleBody {
            price: self.price,
            price_per_km: self.price_per_km,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoutePriceRequest {
    pub price: f64,
}

impl UpdateRoutePriceRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_price("route price", self.price)
    }

    pub(crate) fn to_wire(&self) -> UpdateRouteBody {
        UpdateRouteBody { price: self.price }
    }
}

// ── Legal pages ────────────────────────────────────────────────────

/// Create or full update of a legal page. All four fields are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalPageRequest {
    pub title: String,
    pub page_title: String,
    pub language: String,
    pub content: String,
}

impl LegalPageRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("title", &self.title)?;
        require_text("page title", &self.page_title)?;
        require_text("language", &self.language)?;
        require_text("content", &self.content)
    }

    pub(crate) fn to_wire(&self) -> LegalPageBody {
        LegalPageBody {
            title: self.title.trim().to_owned(),
            content: self.content.clone(),
            language: self.language.trim().to_owned(),
            page_title: self.page_title.trim().to_owned(),
        }
    }
}

// ── Customer e-mail ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerEmailRequest {
    pub subject: String,
    pub message: String,
    pub email: String,
}

impl CustomerEmailRequest {
    /// Pre-filled e-mail to the booking's customer. `subject` and `message`
    /// override the defaults when given.
    pub fn for_booking(
        booking: &Booking,
        subject: Option<String>,
        message: Option<String>,
    ) -> Result<Self, CoreError> {
        let email = booking
            .customer_email()
            .ok_or_else(|| {
                CoreError::validation(
                    "email",
                    format!("booking {} has no customer e-mail address", booking.id),
                )
            })?
            .to_owned();
        Ok(Self {
            subject: subject.unwrap_or_else(|| default_subject(booking)),
            message: message.unwrap_or_else(|| default_message(booking)),
            email,
        })
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("subject", &self.subject)?;
        require_text("message", &self.message)?;
        require_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(CoreError::validation(
                "email",
                format!("{:?} is not an e-mail address", self.email),
            ));
        }
        Ok(())
    }

    pub(crate) fn to_wire(&self) -> CustomerEmailBody {
        CustomerEmailBody {
            subject: self.subject.trim().to_owned(),
            message: self.message.clone(),
            email: self.email.trim().to_owned(),
        }
    }
}

fn default_subject(booking: &Booking) -> String {
    format!(
        "Trip Update - {} to {}",
        booking.departure_location, booking.destination_location
    )
}

fn default_message(booking: &Booking) -> String {
    let (first, last) = booking
        .customer
        .as_ref()
        .map(|c| (c.first_name.as_str(), c.last_name.as_str()))
        .unwrap_or_default();
    let date = booking
        .trip_date_time
        .map_or_else(|| "a date to be confirmed".to_owned(), |d| {
            d.format("%Y-%m-%d").to_string()
        });
    format!(
        "Dear {first} {last},\n\n\
         We hope this message finds you well. We wanted to reach out regarding \
         your upcoming trip scheduled for {date}.\n\n\
         Best regards,\nYour Travel Team"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lifecycle::BookingState;
    use crate::model::{BookingStatus, Customer, EntityId, Pricing, TripDetails};

    fn booking(email: &str) -> Booking {
        Booking {
            id: EntityId::from("B1"),
            customer: Some(Customer {
                first_name: "Ana".into(),
                last_name: "Lopez".into(),
                email: email.into(),
                phone: String::new(),
            }),
            trip_date_time: Some(Utc.with_ymd_and_hms(2025, 7, 14, 8, 0, 0).unwrap()),
            created_at: None,
            status: BookingStatus::Pending,
            cancellation_status: None,
            state: BookingState::Active,
            payment_status: None,
            payment_method: None,
            departure_location: "CDG".into(),
            destination_location: "Louvre".into(),
            pricing: Pricing::default(),
            trip: TripDetails::default(),
        }
    }

    #[test]
    fn email_defaults_are_prefilled() {
        let req = CustomerEmailRequest::for_booking(&booking("ana@x.com"), None, None).unwrap();
        assert_eq!(req.subject, "Trip Update - CDG to Louvre");
        assert!(req.message.starts_with("Dear Ana Lopez,\n\n"));
        assert!(req.message.contains("scheduled for 2025-07-14."));
        assert!(req.message.ends_with("Your Travel Team"));
        assert_eq!(req.email, "ana@x.com");
        req.validate().unwrap();
    }

    #[test]
    fn email_overrides_win() {
        let req = CustomerEmailRequest::for_booking(
            &booking("ana@x.com"),
            Some("Driver update".into()),
            Some("Your driver is Marc.".into()),
        )
        .unwrap();
        assert_eq!(req.subject, "Driver update");
        assert_eq!(req.message, "Your driver is Marc.");
    }

    #[test]
    fn email_needs_customer_address() {
        let err = CustomerEmailRequest::for_booking(&booking("  "), None, None).unwrap_err();
        assert!(err.is_validation());

        let mut req = CustomerEmailRequest::for_booking(&booking("ana@x.com"), None, None).unwrap();
        req.email = "not-an-address".into();
        assert!(req.validate().unwrap_err().is_validation());
    }

    #[test]
    fn vehicle_requests_reject_bad_prices() {
        let bad = CreateVehicleRequest {
            vehicle_type: "Van".into(),
            price: -5.0,
        };
        assert!(bad.validate().is_err());

        let blank = CreateVehicleRequest {
            vehicle_type: " ".into(),
            price: 50.0,
        };
        assert!(blank.validate().is_err());

        let nan = UpdateVehicleRequest {
            price: 10.0,
            price_per_km: f64::NAN,
        };
        assert!(nan.validate().is_err());

        assert!(UpdateRoutePriceRequest { price: 0.0 }.validate().is_ok());
    }

    #[test]
    fn legal_request_requires_every_field() {
        let mut req = LegalPageRequest {
            title: "Privacy Policy".into(),
            page_title: "privacy".into(),
            language: "en".into(),
            content: "We keep your data safe.".into(),
        };
        req.validate().unwrap();
        req.content = "\n".into();
        assert!(req.validate().is_err());
    }
}
