// ── Generic entity collection ──
//
// One published `Listing` per collection: the ordered items plus an id
// index, swapped in as a unit so readers never observe a half-applied
// refresh.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{EntityId, Keyed};

/// Immutable list contents as of one successful fetch.
#[derive(Debug)]
pub struct Listing<T> {
    items: Arc<Vec<Arc<T>>>,
    index: HashMap<EntityId, usize>,
    fetched_at: Option<DateTime<Utc>>,
}

impl<T> Listing<T> {
    fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            index: HashMap::new(),
            fetched_at: None,
        }
    }

    pub fn items(&self) -> &Arc<Vec<Arc<T>>> {
        &self.items
    }

    /// `None` until the first successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

/// The canonical list for a single entity type.
///
/// A `watch` channel holds the current [`Listing`]; readers borrow it and
/// a replacement swaps in a new one.
pub(crate) struct EntityCollection<T: Keyed + Send + Sync + 'static> {
    current: watch::Sender<Arc<Listing<T>>>,
}

impl<T: Keyed + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(Listing::empty()));
        Self { current }
    }

    /// Replace the whole list. Later duplicates of an id win the index slot
    /// but all items stay in order.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.key().clone(), i))
            .collect();
        let listing = Listing {
            items: Arc::new(items),
            index,
            fetched_at: Some(Utc::now()),
        };
        // `send_replace` updates unconditionally, even with zero receivers.
        self.current.send_replace(Arc::new(listing));
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        let listing = self.current.borrow();
        let pos = *listing.index.get(id)?;
        listing.items.get(pos).map(Arc::clone)
    }

    /// Current items (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.current.borrow().items)
    }

    pub(crate) fn listing(&self) -> Arc<Listing<T>> {
        Arc::clone(&self.current.borrow())
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: EntityId,
        label: &'static str,
    }

    impl Keyed for Item {
        fn key(&self) -> &EntityId {
            &self.id
        }
    }

    fn item(id: &str, label: &'static str) -> Item {
        Item {
            id: EntityId::from(id),
            label,
        }
    }

    #[test]
    fn starts_empty_and_unfetched() {
        let col: EntityCollection<Item> = EntityCollection::new();
        assert!(col.snapshot().is_empty());
        assert!(col.listing().fetched_at().is_none());
    }

    #[test]
    fn replace_all_keeps_order_and_indexes() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("b", "second"), item("a", "first")]);

        let snap = col.snapshot();
        assert_eq!(snap[0].label, "second");
        assert_eq!(snap[1].label, "first");
        assert_eq!(col.get(&EntityId::from("a")).unwrap().label, "first");
        assert!(col.listing().fetched_at().is_some());
    }

    #[test]
    fn replace_all_drops_previous_items() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", "x"), item("b", "y")]);
        col.replace_all(vec![item("c", "z")]);

        assert_eq!(col.snapshot().len(), 1);
        assert!(col.get(&EntityId::from("a")).is_none());
        assert_eq!(col.get(&EntityId::from("c")).unwrap().label, "z");
    }

    #[test]
    fn old_snapshots_survive_replacement() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", "x")]);
        let before = col.snapshot();

        col.replace_all(Vec::new());
        assert_eq!(before.len(), 1);
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn listing_swaps_items_and_index_together() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", "x")]);
        let held = col.listing();

        col.replace_all(vec![item("b", "y")]);
        assert_eq!(held.items()[0].label, "x");
        assert!(held.index.contains_key(&EntityId::from("a")));
        assert!(!held.index.contains_key(&EntityId::from("b")));
        assert_eq!(col.listing().items()[0].label, "y");
    }
}
