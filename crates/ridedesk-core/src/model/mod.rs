// ── Domain model ──
//
// Canonical representations of the backend's resources. Every type here
// has already passed validation in `convert`; consumers never see raw
// wire records.

pub mod booking;
pub mod entity_id;
pub mod legal;
pub mod user;
pub mod vehicle;

pub use booking::{
    Booking, BookingStatus, CancellationStatus, Customer, PaymentStatus, Pricing, TripDetails,
};
pub use entity_id::{EntityId, EntityKind, Keyed};
pub use legal::{LegalPage, LegalPageKind};
pub use user::User;
pub use vehicle::{FixedRoute, FleetSummary, Vehicle};
