//! Marketplace index: the derived view of every SWAPPABLE event.
//!
//! The index is never mutated by callers. Store transactions record
//! [`MarketplaceChange`]s and apply them at commit while the store write
//! lock is held, so the index moves in lockstep with the event table.
//! Readers get an `Arc` snapshot and never observe a half-applied commit.

use crate::entities::Event;
use parking_lot::RwLock;
use slotswap_sdk::objects::MarketplaceEntryResponse;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;

/// Projection of a SWAPPABLE [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceEntry {
    pub event_id: i64,
    pub owner_id: i64,
    pub title: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub version: u64,
}

impl From<&Event> for MarketplaceEntry {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id,
            owner_id: event.owner_id,
            title: event.title.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            version: event.version,
        }
    }
}

impl From<&MarketplaceEntry> for MarketplaceEntryResponse {
    fn from(entry: &MarketplaceEntry) -> Self {
        MarketplaceEntryResponse {
            event_id: entry.event_id,
            owner_id: entry.owner_id,
            title: entry.title.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            version: entry.version,
        }
    }
}

/// A pending change to the index, recorded by a store transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceChange {
    /// Insert or refresh the entry for a SWAPPABLE event.
    Listed(MarketplaceEntry),
    Delisted(i64),
}

impl MarketplaceChange {
    /// The change that brings the index in line with `event`'s current state.
    pub fn for_event(event: &Event) -> Self {
        if event.is_swappable() {
            MarketplaceChange::Listed(event.into())
        } else {
            MarketplaceChange::Delisted(event.id)
        }
    }
}

type Entries = BTreeMap<i64, MarketplaceEntry>;

#[derive(Debug, Default)]
pub struct MarketplaceIndex {
    entries: RwLock<Arc<Entries>>,
}

impl MarketplaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// A consistent snapshot of the whole index.
    pub fn snapshot(&self) -> Arc<Entries> {
        Arc::clone(&self.entries.read())
    }

    /// All entries ordered by event id ascending.
    pub fn list(&self) -> Vec<MarketplaceEntry> {
        self.snapshot().values().cloned().collect()
    }

    /// Like [`list`](Self::list) but without the viewer's own slots.
    pub fn list_excluding(&self, viewer_id: i64) -> Vec<MarketplaceEntry> {
        self.snapshot()
            .values()
            .filter(|entry| entry.owner_id != viewer_id)
            .cloned()
            .collect()
    }

    pub fn contains(&self, event_id: i64) -> bool {
        self.entries.read().contains_key(&event_id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Apply a batch of changes as one step.
    ///
    /// Only called from `Transaction::commit`.
    pub(crate) fn apply(&self, changes: Vec<MarketplaceChange>) {
        if changes.is_empty() {
            return;
        }
        let mut guard = self.entries.write();
        let entries = Arc::make_mut(&mut guard);
        for change in changes {
            match change {
                MarketplaceChange::Listed(entry) => {
                    entries.insert(entry.event_id, entry);
                }
                MarketplaceChange::Delisted(event_id) => {
                    entries.remove(&event_id);
                }
            }
        }
    }

    /// Replace the index with the SWAPPABLE subset of `events`.
    ///
    /// The new map is built before the swap, so concurrent readers see
    /// either the old or the new index in full. Running it twice over the
    /// same events yields the same index.
    pub fn rebuild<'a>(&self, events: impl IntoIterator<Item = &'a Event>) {
        let rebuilt: Entries = events
            .into_iter()
            .filter(|event| event.is_swappable())
            .map(|event| (event.id, MarketplaceEntry::from(event)))
            .collect();
        *self.entries.write() = Arc::new(rebuilt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EventStatus;
    use time::Duration;

    fn event(id: i64, owner_id: i64, status: EventStatus) -> Event {
        let start = OffsetDateTime::UNIX_EPOCH + Duration::hours(id);
        Event {
            id,
            owner_id,
            title: format!("slot {id}"),
            start_time: start,
            end_time: start + Duration::hours(1),
            status,
            version: 1,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn apply_lists_and_delists() {
        let index = MarketplaceIndex::new();
        let e1 = event(1, 10, EventStatus::Swappable);
        let e2 = event(2, 20, EventStatus::Swappable);
        index.apply(vec![
            MarketplaceChange::for_event(&e2),
            MarketplaceChange::for_event(&e1),
        ]);
        let ids: Vec<i64> = index.list().iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec![1, 2]);

        index.apply(vec![MarketplaceChange::Delisted(1)]);
        assert!(!index.contains(1));
        assert!(index.contains(2));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn busy_event_maps_to_delisting() {
        let e = event(3, 10, EventStatus::Busy);
        assert_eq!(MarketplaceChange::for_event(&e), MarketplaceChange::Delisted(3));
    }

    #[test]
    fn list_excluding_hides_viewer_slots() {
        let index = MarketplaceIndex::new();
        let events = [
            event(1, 10, EventStatus::Swappable),
            event(2, 20, EventStatus::Swappable),
            event(3, 10, EventStatus::Swappable),
        ];
        index.rebuild(events.iter());
        let ids: Vec<i64> = index.list_excluding(10).iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let index = MarketplaceIndex::new();
        let events = [
            event(1, 10, EventStatus::Swappable),
            event(2, 20, EventStatus::Busy),
            event(3, 30, EventStatus::Swappable),
        ];
        index.rebuild(events.iter());
        let first = index.list();
        index.rebuild(events.iter());
        assert_eq!(first, index.list());
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn snapshot_survives_later_writes() {
        let index = MarketplaceIndex::new();
        index.apply(vec![MarketplaceChange::for_event(&event(
            1,
            10,
            EventStatus::Swappable,
        ))]);
        let before = index.snapshot();
        index.apply(vec![MarketplaceChange::Delisted(1)]);
        assert!(before.contains_key(&1));
        assert!(index.is_empty());
    }
}
