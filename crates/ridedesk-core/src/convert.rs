// ── API-to-domain type conversions ──
//
// Bridges raw `ridedesk_api` wire records into canonical `ridedesk_core::model`
// domain types. Lenient fields get defaults; fields the lifecycle depends on
// are validated, and a record that fails is rejected as `InvalidRecord`.

use chrono::{DateTime, NaiveDateTime, Utc};

use ridedesk_api::models::{
    BookingRecord, CustomerRecord, FixedRouteRecord, LegalRecord, UserRecord, VehicleRecord,
};

use crate::error::CoreError;
use crate::lifecycle::BookingState;
use crate::model::{
    Booking, BookingStatus, CancellationStatus, Customer, EntityId, EntityKind, FixedRoute,
    LegalPage, LegalPageKind, Pricing, TripDetails, User, Vehicle,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp. Offset-less values are taken as UTC.
/// Unparseable values are dropped.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn text(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_owned()).unwrap_or_default()
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn invalid(kind: EntityKind, identifier: &str, reason: impl Into<String>) -> CoreError {
    CoreError::InvalidRecord {
        entity_type: kind.to_string(),
        identifier: identifier.to_owned(),
        reason: reason.into(),
    }
}

// ── User ───────────────────────────────────────────────────────────

impl TryFrom<UserRecord> for User {
    type Error = CoreError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        if r.id.trim().is_empty() {
            return Err(invalid(EntityKind::User, "<blank>", "missing id"));
        }
        Ok(User {
            id: EntityId::from(r.id),
            first_name: text(r.first_name),
            last_name: text(r.last_name),
            email: text(r.email),
            phone: text(r.phone),
            is_active: r.is_active,
            created_at: parse_datetime(r.created_at.as_deref()),
        })
    }
}

// ── Booking ────────────────────────────────────────────────────────

impl From<CustomerRecord> for Customer {
    fn from(c: CustomerRecord) -> Self {
        Customer {
            first_name: text(c.first_name),
            last_name: text(c.last_name),
            email: text(c.email),
            phone: text(c.phone),
        }
    }
}

impl TryFrom<BookingRecord> for Booking {
    type Error = CoreError;

    /// Rejects records whose lifecycle strings are unknown or form an
    /// illegal pair, and records refunded beyond their total.
    fn try_from(r: BookingRecord) -> Result<Self, Self::Error> {
        let id = r.booking_id.trim().to_owned();
        if id.is_empty() {
            return Err(invalid(EntityKind::Booking, "<blank>", "missing bookingId"));
        }

        let status: BookingStatus = match non_blank(r.status) {
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid(EntityKind::Booking, &id, format!("unknown status {raw:?}")))?,
            None => return Err(invalid(EntityKind::Booking, &id, "missing status")),
        };

        let cancellation_status: Option<CancellationStatus> = non_blank(r.cancellation_status)
            .map(|raw| {
                raw.parse().map_err(|_| {
                    invalid(
                        EntityKind::Booking,
                        &id,
                        format!("unknown cancellationStatus {raw:?}"),
                    )
                })
            })
            .transpose()?;

        let state = BookingState::derive(status, cancellation_status)
            .map_err(|e| invalid(EntityKind::Booking, &id, e.to_string()))?;

        let pricing = Pricing {
            total_price: r.total_price,
            language_fee: r.language_fee.unwrap_or_default(),
            welcome_sign_fee: r.welcome_sign_fee.unwrap_or_default(),
            refunded_amount: r.refunded_amount.unwrap_or_default(),
        };
        if pricing.refunded_amount < 0.0 {
            return Err(invalid(EntityKind::Booking, &id, "negative refundedAmount"));
        }
        if let Some(total) = pricing.total_price {
            if pricing.refunded_amount > total {
                return Err(invalid(
                    EntityKind::Booking,
                    &id,
                    format!(
                        "refundedAmount {:.2} exceeds totalPrice {total:.2}",
                        pricing.refunded_amount
                    ),
                ));
            }
        }

        let trip = TripDetails {
            flight_number: non_blank(r.flight_number),
            driver_language: non_blank(r.driver_language),
            vehicle_type: non_blank(r.vehicle_type),
            distance: r.distance,
            time: r.time,
            passengers: r.passengers.unwrap_or_default(),
            bags: r.bags.unwrap_or_default(),
            pets: r.pets.unwrap_or_default(),
            strollers: r.strollers.unwrap_or_default(),
            wheelchair: r.wheelchair.unwrap_or_default(),
            booster_seat: r.booster_seat.unwrap_or_default(),
            child_seat: r.child_seat.unwrap_or_default(),
            welcome_sign: r.welcome_sign.unwrap_or_default(),
            specific_language: r.specific_language.unwrap_or_default(),
            special_instructions: non_blank(r.special_instructions),
            cancellation_reason: non_blank(r.cancellation_reason),
        };

        Ok(Booking {
            id: EntityId::from(id),
            customer: r.customer.map(Customer::from),
            trip_date_time: parse_datetime(r.trip_date_time.as_deref()),
            created_at: parse_datetime(r.created_at.as_deref()),
            status,
            cancellation_status,
            state,
            // Unknown payment strings are display-only; drop them.
            payment_status: non_blank(r.payment_status).and_then(|s| s.parse().ok()),
            payment_method: non_blank(r.payment_method),
            departure_location: text(r.departure_location),
            destination_location: text(r.destination_location),
            pricing,
            trip,
        })
    }
}

// ── Vehicle ────────────────────────────────────────────────────────

impl From<FixedRouteRecord> for FixedRoute {
    fn from(r: FixedRouteRecord) -> Self {
        FixedRoute {
            id: EntityId::from(r.route_id),
            start: text(r.start),
            destination: text(r.destination),
            price: r.price,
            vehicle_type_id: non_blank(r.vehicle_type_id).map(EntityId::from),
        }
    }
}

impl From<VehicleRecord> for Vehicle {
    fn from(v: VehicleRecord) -> Self {
        Vehicle {
            id: EntityId::from(v.vehicle_id),
            vehicle_type: text(v.vehicle_type),
            price: v.price,
            price_per_km: v.price_per_km,
            fixed_routes: v
                .fixed_routes
                .unwrap_or_default()
                .into_iter()
                .map(FixedRoute::from)
                .collect(),
            created_at: parse_datetime(v.created_at.as_deref()),
            updated_at: parse_datetime(v.updated_at.as_deref()),
        }
    }
}

// ── Legal ──────────────────────────────────────────────────────────

impl TryFrom<LegalRecord> for LegalPage {
    type Error = CoreError;

    fn try_from(r: LegalRecord) -> Result<Self, Self::Error> {
        let id = r
            .identifier()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(EntityId::from)
            .ok_or_else(|| invalid(EntityKind::LegalPage, "<blank>", "missing postId and id"))?;
        let page_title = text(r.page_title);
        Ok(LegalPage {
            id,
            title: text(r.title),
            kind: LegalPageKind::classify(&page_title),
            page_title,
            content: r.content.unwrap_or_default(),
            language: text(r.language),
            created_at: parse_datetime(r.created_at.as_deref()),
            updated_at: parse_datetime(r.updated_at.as_deref()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Timelike};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn booking_record(value: serde_json::Value) -> BookingRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parse_datetime_accepts_offsets_and_naive() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_datetime(Some("2025-06-01T09:30:00Z")), Some(expected));
        assert_eq!(parse_datetime(Some("2025-06-01T11:30:00+02:00")), Some(expected));
        assert_eq!(parse_datetime(Some("2025-06-01T09:30:00.000")), Some(expected));
        assert_eq!(parse_datetime(Some("tomorrow")), None);
        assert_eq!(parse_datetime(Some("")), None);
        assert_eq!(parse_datetime(None), None);
    }

    #[test]
    fn booking_with_pending_request() {
        let booking = Booking::try_from(booking_record(json!({
            "bookingId": "B1",
            "status": "PENDING",
            "cancellationStatus": "PENDING",
            "tripDateTime": "2025-06-01T09:30:00.000Z",
            "departureLocation": " Airport CDG ",
            "destinationLocation": "Hotel",
            "totalPrice": "120.50",
            "refundedAmount": null,
            "passengers": 3,
            "customer": { "firstName": "Ana", "lastName": "Lopez", "email": "ana@x.com" }
        })))
        .unwrap();

        assert_eq!(booking.state, BookingState::CancelRequested);
        assert_eq!(booking.pricing.total_price, Some(120.5));
        assert_eq!(booking.pricing.refunded_amount, 0.0);
        assert_eq!(booking.departure_location, "Airport CDG");
        assert_eq!(booking.trip.passengers, 3);
        assert_eq!(booking.customer_name(), "Ana Lopez");
        assert_eq!(booking.trip_date_time.unwrap().minute(), 30);
    }

    #[test]
    fn blank_cancellation_status_means_no_request() {
        let booking = Booking::try_from(booking_record(json!({
            "bookingId": "B2",
            "status": "completed",
            "cancellationStatus": ""
        })))
        .unwrap();
        assert_eq!(booking.cancellation_status, None);
        assert_eq!(booking.state, BookingState::Completed);
    }

    #[test]
    fn illegal_lifecycle_pair_is_rejected() {
        let err = Booking::try_from(booking_record(json!({
            "bookingId": "B3",
            "status": "CANCELLED",
            "cancellationStatus": "PENDING"
        })))
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord { ref identifier, .. } if identifier == "B3"));
    }

    #[test]
    fn unknown_or_missing_status_is_rejected() {
        for record in [
            json!({ "bookingId": "B4", "status": "ON_HOLD" }),
            json!({ "bookingId": "B5" }),
            json!({ "bookingId": "B6", "status": "PENDING", "cancellationStatus": "REFUNDED" }),
        ] {
            assert!(Booking::try_from(booking_record(record)).is_err());
        }
    }

    #[test]
    fn over_refunded_booking_is_rejected() {
        let err = Booking::try_from(booking_record(json!({
            "bookingId": "B7",
            "status": "PENDING",
            "cancellationStatus": "APPROVED",
            "totalPrice": 50,
            "refundedAmount": 60
        })))
        .unwrap_err();
        assert!(err.to_string().contains("exceeds totalPrice"));
    }

    #[test]
    fn legal_page_prefers_post_id() {
        let record: LegalRecord = serde_json::from_value(json!({
            "postId": "p-1",
            "id": "ignored",
            "title": "Privacy",
            "pageTitle": "PRIVACY",
            "content": "text",
            "language": "fr"
        }))
        .unwrap();
        let page = LegalPage::try_from(record).unwrap();
        assert_eq!(page.id.as_str(), "p-1");
        assert_eq!(page.kind, LegalPageKind::Privacy);
    }

    #[test]
    fn legal_page_without_identifier_is_rejected() {
        let record: LegalRecord = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert!(LegalPage::try_from(record).is_err());
    }

    #[test]
    fn vehicle_flattens_routes() {
        let record: VehicleRecord = serde_json::from_value(json!({
            "vehicleId": "v1",
            "vehicleType": "Van",
            "price": 80,
            "fixedRoutes": [
                { "routeId": "r1", "start": "CDG", "destination": "Paris", "price": 65, "vehicleTypeId": "v1" }
            ]
        }))
        .unwrap();
        let vehicle = Vehicle::from(record);
        assert_eq!(vehicle.fixed_routes.len(), 1);
        assert_eq!(vehicle.fixed_routes[0].vehicle_type_id, Some(EntityId::from("v1")));
        assert_eq!(vehicle.price, Some(80.0));
    }
}
