// ── Central data store ──
//
// Holds the canonical list of every entity family for one console
// session. Lists are replaced wholesale by refreshes; search views are
// computed from snapshots and never written back.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::collection::EntityCollection;
use crate::model::{Booking, EntityId, FixedRoute, LegalPage, User, Vehicle};

/// Canonical lists for users, bookings, vehicles and legal pages.
pub struct DataStore {
    pub(crate) users: EntityCollection<User>,
    pub(crate) bookings: EntityCollection<Booking>,
    pub(crate) vehicles: EntityCollection<Vehicle>,
    pub(crate) legal_pages: EntityCollection<LegalPage>,
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            users: EntityCollection::new(),
            bookings: EntityCollection::new(),
            vehicles: EntityCollection::new(),
            legal_pages: EntityCollection::new(),
        }
    }

    // ── Replacement ──────────────────────────────────────────────────

    pub(crate) fn replace_users(&self, users: Vec<User>) {
        self.users.replace_all(users);
    }

    pub(crate) fn replace_bookings(&self, bookings: Vec<Booking>) {
        self.bookings.replace_all(bookings);
    }

    pub(crate) fn replace_vehicles(&self, vehicles: Vec<Vehicle>) {
        self.vehicles.replace_all(vehicles);
    }

    pub(crate) fn replace_legal_pages(&self, pages: Vec<LegalPage>) {
        self.legal_pages.replace_all(pages);
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    /// Bookings in backend order. Use `filter::filter_bookings` for the
    /// trip-time ordering shown to operators.
    pub fn bookings_snapshot(&self) -> Arc<Vec<Arc<Booking>>> {
        self.bookings.snapshot()
    }

    pub fn vehicles_snapshot(&self) -> Arc<Vec<Arc<Vehicle>>> {
        self.vehicles.snapshot()
    }

    pub fn legal_pages_snapshot(&self) -> Arc<Vec<Arc<LegalPage>>> {
        self.legal_pages.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn user_by_id(&self, id: &EntityId) -> Option<Arc<User>> {
        self.users.get(id)
    }

    pub fn booking_by_id(&self, id: &EntityId) -> Option<Arc<Booking>> {
        self.bookings.get(id)
    }

    pub fn vehicle_by_id(&self, id: &EntityId) -> Option<Arc<Vehicle>> {
        self.vehicles.get(id)
    }

    pub fn legal_page_by_id(&self, id: &EntityId) -> Option<Arc<LegalPage>> {
        self.legal_pages.get(id)
    }

    /// Fixed routes are nested under vehicles; scan for the route id.
    pub fn route_by_id(&self, id: &EntityId) -> Option<FixedRoute> {
        self.vehicles
            .snapshot()
            .iter()
            .flat_map(|v| v.fixed_routes.iter())
            .find(|r| &r.id == id)
            .cloned()
    }

    // ── Freshness ────────────────────────────────────────────────────

    /// When bookings were last fetched successfully.
    pub fn bookings_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.bookings.listing().fetched_at()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vehicle(id: &str, routes: &[&str]) -> Vehicle {
        Vehicle {
            id: EntityId::from(id),
            vehicle_type: "Van".into(),
            price: Some(70.0),
            price_per_km: None,
            fixed_routes: routes
                .iter()
                .map(|r| FixedRoute {
                    id: EntityId::from(*r),
                    start: "CDG".into(),
                    destination: "Paris".into(),
                    price: Some(60.0),
                    vehicle_type_id: Some(EntityId::from(id)),
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn route_lookup_searches_nested_routes() {
        let store = DataStore::new();
        store.replace_vehicles(vec![vehicle("v1", &["r1"]), vehicle("v2", &["r2", "r3"])]);

        let route = store.route_by_id(&EntityId::from("r3")).unwrap();
        assert_eq!(route.vehicle_type_id, Some(EntityId::from("v2")));
        assert!(store.route_by_id(&EntityId::from("r9")).is_none());
    }

    #[test]
    fn collections_are_independent() {
        let store = DataStore::new();
        store.replace_vehicles(vec![vehicle("v1", &[])]);
        assert_eq!(store.vehicles_snapshot().len(), 1);
        assert!(store.bookings_snapshot().is_empty());
        assert!(store.bookings_fetched_at().is_none());
    }
}
