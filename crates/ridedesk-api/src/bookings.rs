// Booking endpoints
//
// Listing, the cancellation decision call, and the customer e-mail relay.

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{BookingRecord, CustomerEmailBody, HandleCancellationBody, ListEnvelope};

/// Header carrying the per-decision deduplication key.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

impl AdminClient {
    /// List bookings, one page.
    ///
    /// `GET /bookings/admin/all?page={page}&limit={limit}` → `{ data: Booking[] }`
    pub async fn list_bookings(&self, page: u32, limit: u32) -> Result<Vec<BookingRecord>, Error> {
        let envelope: ListEnvelope<BookingRecord> = self
            .get(
                &["bookings", "admin", "all"],
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        debug!(count = envelope.data.len(), page, limit, "fetched bookings");
        Ok(envelope.data)
    }

    /// Approve or reject a pending customer cancellation.
    ///
    /// `POST /bookings/admin/{booking_id}/handle-cancellation`. The
    /// `idempotency_key` is sent as `Idempotency-Key` so a backend that
    /// honours it can drop duplicate submissions of one decision.
    pub async fn handle_cancellation(
        &self,
        booking_id: &str,
        body: &HandleCancellationBody,
        idempotency_key: Uuid,
    ) -> Result<(), Error> {
        debug!(booking_id, action = ?body.action, %idempotency_key, "submitting cancellation decision");
        let builder = self
            .authorized(
                Method::POST,
                &["bookings", "admin", booking_id, "handle-cancellation"],
            )?
            .header(IDEMPOTENCY_HEADER, idempotency_key.to_string())
            .json(body);
        let resp = self.send(builder).await?;
        self.handle_empty(resp).await
    }

    /// Relay an e-mail to a customer.
    ///
    /// `POST /bookings/admin/send-email` with `{subject, message, email}`.
    pub async fn send_customer_email(&self, body: &CustomerEmailBody) -> Result<(), Error> {
        debug!(to = %body.email, "sending customer e-mail");
        self.post_no_response(&["bookings", "admin", "send-email"], body).await
    }
}
