// ── Canonical list store ──
//
// Session-scoped copies of the backend's lists. Each list is replaced
// wholesale by a successful re-fetch and never modified by filtering.

mod collection;
mod data_store;
mod inflight;

pub use collection::Listing;
pub use data_store::DataStore;
pub use inflight::{InFlight, InFlightGuard};
