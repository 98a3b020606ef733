// ── List filtering ──
//
// Search is a pure projection over the canonical lists held in the
// `DataStore`: the input slice is never modified, and an empty query
// yields the whole list. Matching is a case-insensitive substring test
// over a fixed field set per entity.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::model::{Booking, LegalPage, User, Vehicle};

/// Normalized search input (trimmed, lower-cased).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// A query that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test against one field.
    pub fn hits(&self, field: &str) -> bool {
        self.is_empty() || field.to_lowercase().contains(&self.0)
    }

    fn hits_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        self.is_empty() || fields.into_iter().any(|f| self.hits(f))
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Option<&str>> for SearchQuery {
    fn from(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }
}

/// Entities that can be matched by a [`SearchQuery`].
pub trait Searchable {
    fn matches(&self, query: &SearchQuery) -> bool;
}

impl Searchable for User {
    /// Full name, email, phone.
    fn matches(&self, query: &SearchQuery) -> bool {
        let name = self.full_name();
        query.hits_any([name.as_str(), self.email.as_str(), self.phone.as_str()])
    }
}

impl Searchable for Booking {
    /// Customer full name, email and phone, plus both trip endpoints.
    fn matches(&self, query: &SearchQuery) -> bool {
        let endpoints = [
            self.departure_location.as_str(),
            self.destination_location.as_str(),
        ];
        match &self.customer {
            Some(c) => {
                let name = c.full_name();
                query.hits_any(
                    [name.as_str(), c.email.as_str(), c.phone.as_str()]
                        .into_iter()
                        .chain(endpoints),
                )
            }
            None => query.hits_any(endpoints),
        }
    }
}

impl Searchable for Vehicle {
    fn matches(&self, query: &SearchQuery) -> bool {
        query.hits(&self.vehicle_type)
    }
}

impl Searchable for LegalPage {
    fn matches(&self, query: &SearchQuery) -> bool {
        query.hits_any([
            self.title.as_str(),
            self.page_title.as_str(),
            self.kind.label(),
            self.language.as_str(),
        ])
    }
}

/// Order-preserving filter over any searchable list.
pub fn filter<T: Searchable>(items: &[Arc<T>], query: &SearchQuery) -> Vec<Arc<T>> {
    items
        .iter()
        .filter(|item| item.matches(query))
        .map(Arc::clone)
        .collect()
}

pub fn filter_users(users: &[Arc<User>], query: &SearchQuery) -> Vec<Arc<User>> {
    filter(users, query)
}

/// Filter bookings, then sort ascending by trip time.
///
/// The sort applies whether or not a query is active. It is stable, and
/// bookings without a trip time go last.
pub fn filter_bookings(bookings: &[Arc<Booking>], query: &SearchQuery) -> Vec<Arc<Booking>> {
    let mut out = filter(bookings, query);
    sort_by_trip_time(&mut out);
    out
}

pub fn sort_by_trip_time(bookings: &mut [Arc<Booking>]) {
    bookings.sort_by(|a, b| match (a.trip_date_time, b.trip_date_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lifecycle::BookingState;
    use crate::model::{BookingStatus, Customer, EntityId, Pricing, TripDetails};

    fn user(id: &str, first: &str, last: &str, email: &str, phone: &str) -> Arc<User> {
        Arc::new(User {
            id: EntityId::from(id),
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone: phone.into(),
            is_active: true,
            created_at: None,
        })
    }

    fn booking(id: &str, first: &str, from: &str, to: &str, day: Option<u32>) -> Arc<Booking> {
        Arc::new(Booking {
            id: EntityId::from(id),
            customer: Some(Customer {
                first_name: first.into(),
                last_name: "Doe".into(),
                email: format!("{}@mail.test", first.to_lowercase()),
                phone: "+33 6 00".into(),
            }),
            trip_date_time: day.map(|d| Utc.with_ymd_and_hms(2025, 6, d, 9, 0, 0).unwrap()),
            created_at: None,
            status: BookingStatus::Pending,
            cancellation_status: None,
            state: BookingState::Active,
            payment_status: None,
            payment_method: None,
            departure_location: from.into(),
            destination_location: to.into(),
            pricing: Pricing::default(),
            trip: TripDetails::default(),
        })
    }

    fn ids<T: crate::model::Keyed>(items: &[Arc<T>]) -> Vec<String> {
        items.iter().map(|i| i.key().to_string()).collect()
    }

    #[test]
    fn user_search_is_case_insensitive_substring() {
        let users = vec![
            user("1", "Ana", "Lopez", "ana@x.com", "111"),
            user("2", "Bob", "Stone", "bob@y.com", "222"),
        ];
        let hits = filter_users(&users, &SearchQuery::new("ANA"));
        assert_eq!(ids(&hits), vec!["1"]);
    }

    #[test]
    fn user_search_covers_full_name_email_phone() {
        let users = vec![
            user("1", "Ana", "Lopez", "ana@x.com", "111"),
            user("2", "Bob", "Stone", "bob@y.com", "222"),
        ];
        assert_eq!(ids(&filter_users(&users, &"a lop".into())), vec!["1"]);
        assert_eq!(ids(&filter_users(&users, &"Y.COM".into())), vec!["2"]);
        assert_eq!(ids(&filter_users(&users, &"22".into())), vec!["2"]);
        assert!(filter_users(&users, &"zzz".into()).is_empty());
    }

    #[test]
    fn booking_search_covers_customer_and_endpoints() {
        let bookings = vec![
            booking("b1", "Ana", "Airport CDG", "Hotel Lutetia", Some(3)),
            booking("b2", "Bob", "Gare de Lyon", "Orly", Some(1)),
        ];
        assert_eq!(ids(&filter_bookings(&bookings, &"cdg".into())), vec!["b1"]);
        assert_eq!(ids(&filter_bookings(&bookings, &"ORLY".into())), vec!["b2"]);
        assert_eq!(ids(&filter_bookings(&bookings, &"bob@".into())), vec!["b2"]);
    }

    #[test]
    fn booking_without_customer_matches_on_endpoints_only() {
        let mut b = (*booking("b1", "Ana", "Airport", "Center", Some(1))).clone();
        b.customer = None;
        let bookings = vec![Arc::new(b)];
        assert_eq!(ids(&filter_bookings(&bookings, &"airport".into())), vec!["b1"]);
        assert!(filter_bookings(&bookings, &"ana".into()).is_empty());
    }

    #[test]
    fn bookings_always_sorted_by_trip_time() {
        let bookings = vec![
            booking("late", "Ana", "A", "B", Some(20)),
            booking("undated", "Ana", "A", "B", None),
            booking("early", "Ana", "A", "B", Some(2)),
            booking("mid", "Ana", "A", "B", Some(10)),
        ];

        for query in [SearchQuery::all(), SearchQuery::new("ana")] {
            let out = filter_bookings(&bookings, &query);
            assert_eq!(ids(&out), vec!["early", "mid", "late", "undated"]);
            assert!(out.windows(2).all(|w| match (w[0].trip_date_time, w[1].trip_date_time) {
                (Some(a), Some(b)) => a <= b,
                (_, None) => true,
                (None, Some(_)) => false,
            }));
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let users = vec![
            user("1", "Ana", "Lopez", "ana@x.com", "111"),
            user("2", "Anabel", "Ruiz", "ar@x.com", "333"),
            user("3", "Bob", "Stone", "bob@y.com", "222"),
        ];
        let query = SearchQuery::new("ana");
        let once = filter_users(&users, &query);
        let twice = filter_users(&once, &query);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn empty_query_restores_full_list() {
        let users = vec![
            user("1", "Ana", "Lopez", "ana@x.com", "111"),
            user("2", "Bob", "Stone", "bob@y.com", "222"),
        ];
        let narrowed = filter_users(&users, &"bob".into());
        assert_eq!(narrowed.len(), 1);

        // The canonical slice is untouched; clearing the query gives it all back.
        let cleared = filter_users(&users, &SearchQuery::new("   "));
        assert_eq!(ids(&cleared), vec!["1", "2"]);
    }
}
