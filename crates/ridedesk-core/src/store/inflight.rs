// ── Per-entity in-flight guard ──
//
// At most one mutating request per entity at a time. A second attempt
// while the first is outstanding is refused instead of queued.

use std::sync::Arc;

use dashmap::DashSet;
use tracing::trace;

use crate::model::{EntityId, EntityKind};

type Slot = (EntityKind, EntityId);

/// Set of entities with a mutating request outstanding.
#[derive(Debug, Default)]
pub struct InFlight {
    active: DashSet<Slot>,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the entity. Returns `None` if it is already claimed.
    pub fn try_acquire(self: &Arc<Self>, kind: EntityKind, id: &EntityId) -> Option<InFlightGuard> {
        let slot = (kind, id.clone());
        if self.active.insert(slot.clone()) {
            trace!(%kind, %id, "in-flight slot claimed");
            Some(InFlightGuard {
                owner: Arc::clone(self),
                slot,
            })
        } else {
            None
        }
    }

}

/// Releases its slot on drop, including on early return or panic.
#[derive(Debug)]
pub struct InFlightGuard {
    owner: Arc<InFlight>,
    slot: Slot,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner.active.remove(&self.slot);
        trace!(kind = %self.slot.0, id = %self.slot.1, "in-flight slot released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let inflight = InFlight::new();
        let id = EntityId::from("B1");

        let guard = inflight.try_acquire(EntityKind::Booking, &id);
        assert!(guard.is_some());
        assert!(inflight.try_acquire(EntityKind::Booking, &id).is_none());

        drop(guard);
        assert!(inflight.try_acquire(EntityKind::Booking, &id).is_some());
    }

    #[test]
    fn slots_are_per_kind_and_id() {
        let inflight = InFlight::new();
        let id = EntityId::from("42");

        let _booking = inflight.try_acquire(EntityKind::Booking, &id);
        assert!(inflight.try_acquire(EntityKind::Vehicle, &id).is_some());
        assert!(
            inflight
                .try_acquire(EntityKind::Booking, &EntityId::from("43"))
                .is_some()
        );
    }

    #[test]
    fn guards_release_on_drop() {
        let inflight = InFlight::new();
        {
            let _a = inflight.try_acquire(EntityKind::User, &EntityId::from("u1"));
            let _b = inflight.try_acquire(EntityKind::User, &EntityId::from("u2"));
            assert_eq!(inflight.active.len(), 2);
        }
        assert!(inflight.active.is_empty());
    }
}
