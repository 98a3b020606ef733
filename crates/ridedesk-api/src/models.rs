// Wire types for the admin backend.
//
// Field names mirror the backend JSON (camelCase). Decoding is lenient:
// optional fields default, nullable fields are `Option`, and monetary
// values tolerate numeric strings. Timestamps stay as raw strings here;
// `ridedesk-core` parses them during conversion.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{ data: [...] }` list envelope used by the users and bookings endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Sign-in response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Bookings ─────────────────────────────────────────────────────────

/// Customer snapshot embedded in a booking. May be `null` for bookings
/// whose account was removed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub booking_id: String,
    #[serde(default)]
    pub customer: Option<CustomerRecord>,
    #[serde(default)]
    pub trip_date_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cancellation_status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub departure_location: Option<String>,
    #[serde(default)]
    pub destination_location: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub driver_language: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub time: Option<f64>,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub bags: Option<u32>,
    #[serde(default)]
    pub pets: Option<u32>,
    #[serde(default)]
    pub strollers: Option<u32>,
    #[serde(default)]
    pub wheelchair: Option<bool>,
    #[serde(default)]
    pub booster_seat: Option<bool>,
    #[serde(default)]
    pub child_seat: Option<bool>,
    #[serde(default)]
    pub welcome_sign: Option<bool>,
    #[serde(default)]
    pub specific_language: Option<bool>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub language_fee: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub welcome_sign_fee: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub refunded_amount: Option<f64>,
}

/// Operator decision on a pending customer cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    Approve,
    Reject,
}

/// Body of `POST /bookings/admin/{id}/handle-cancellation`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleCancellationBody {
    pub action: DecisionAction,
    #[serde(serialize_with = "amount")]
    pub refund_amount: f64,
    pub rejection_or_approval_comments: String,
}

/// Body of `POST /bookings/admin/send-email`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerEmailBody {
    pub subject: String,
    pub message: String,
    pub email: String,
}

// ── Vehicles ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub vehicle_id: String,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub price_per_km: Option<f64>,
    #[serde(default)]
    pub fixed_routes: Option<Vec<FixedRouteRecord>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedRouteRecord {
    pub route_id: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub vehicle_type_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleBody {
    pub vehicle_type: String,
    #[serde(serialize_with = "amount")]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleBody {
    #[serde(serialize_with = "amount")]
    pub price: f64,
    #[serde(serialize_with = "amount")]
    pub price_per_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRouteBody {
    #[serde(serialize_with = "amount")]
    pub price: f64,
}

// ── Legal ────────────────────────────────────────────────────────────

/// Legal content page. Older records carry `postId`, newer ones `id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalRecord {
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl LegalRecord {
    pub fn identifier(&self) -> Option<&str> {
        self.post_id.as_deref().or(self.id.as_deref())
    }
}

/// Body of `POST /legal` and `PATCH /legal/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalPageBody {
    pub title: String,
    pub content: String,
    pub language: String,
    pub page_title: String,
}

// ── Serde helpers ────────────────────────────────────────────────────

/// Accept `12.5`, `"12.5"`, `""` or `null`.
fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid number {s:?}: {e}"))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Whole amounts go out as JSON integers (`40`, not `40.0`).
#[allow(clippy::trivially_copy_pass_by_ref)]
fn amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const EXACT_INT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_INT {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let whole = *value as i64;
        serializer.serialize_i64(whole)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn booking_with_null_customer_and_string_prices() {
        let raw = json!({
            "bookingId": "B7",
            "customer": null,
            "status": "PENDING",
            "cancellationStatus": null,
            "totalPrice": "120.50",
            "refundedAmount": 0,
            "passengers": 2
        });
        let booking: BookingRecord = serde_json::from_value(raw).unwrap();
        assert!(booking.customer.is_none());
        assert_eq!(booking.total_price, Some(120.5));
        assert_eq!(booking.refunded_amount, Some(0.0));
        assert_eq!(booking.passengers, Some(2));
        assert_eq!(booking.language_fee, None);
    }

    #[test]
    fn bad_price_string_is_an_error() {
        let raw = json!({ "bookingId": "B1", "totalPrice": "lots" });
        assert!(serde_json::from_value::<BookingRecord>(raw).is_err());
    }

    #[test]
    fn cancellation_body_uses_integer_amounts() {
        let body = HandleCancellationBody {
            action: DecisionAction::Approve,
            refund_amount: 40.0,
            rejection_or_approval_comments: "customer request valid".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "action": "APPROVE",
                "refundAmount": 40,
                "rejectionOrApprovalComments": "customer request valid"
            })
        );

        let partial = HandleCancellationBody {
            action: DecisionAction::Approve,
            refund_amount: 12.75,
            rejection_or_approval_comments: "partial".into(),
        };
        assert_eq!(
            serde_json::to_value(&partial).unwrap()["refundAmount"],
            json!(12.75)
        );
    }

    #[test]
    fn legal_identifier_prefers_post_id() {
        let both: LegalRecord =
            serde_json::from_value(json!({ "postId": "p1", "id": "i1" })).unwrap();
        assert_eq!(both.identifier(), Some("p1"));

        let only_id: LegalRecord = serde_json::from_value(json!({ "id": "i2" })).unwrap();
        assert_eq!(only_id.identifier(), Some("i2"));
    }
}
