use super::{StoreError, Tables};
use crate::entities::{Event, EventInsert, EventStatus, SwapRequest, SwapRequestInsert, SwapStatus};
use crate::marketplace::{MarketplaceChange, MarketplaceIndex};
use std::ops::Deref;
use time::OffsetDateTime;
use tokio::sync::RwLockWriteGuard;
use tracing::debug;

enum Undo {
    EventInserted { event_id: i64, previous_last_id: i64 },
    EventReplaced(Event),
    EventRemoved(Event),
    RequestInserted { request_id: i64, previous_last_id: i64 },
    RequestReplaced(SwapRequest),
}

/// A serialized write transaction over [`Tables`].
///
/// Dropping a transaction without calling [`commit`](Self::commit) reverts
/// every write made through it, and the marketplace index is left untouched.
pub struct Transaction<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    marketplace: &'a MarketplaceIndex,
    undo: Vec<Undo>,
    changes: Vec<MarketplaceChange>,
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub(super) fn new(
        tables: RwLockWriteGuard<'a, Tables>,
        marketplace: &'a MarketplaceIndex,
    ) -> Self {
        Self {
            tables,
            marketplace,
            undo: Vec::new(),
            changes: Vec::new(),
            committed: false,
        }
    }

    /// Insert a new BUSY event at version 0.
    pub fn insert_event(&mut self, insert: EventInsert, now: OffsetDateTime) -> Event {
        let previous_last_id = self.tables.last_event_id;
        let event_id = previous_last_id + 1;
        let event = Event {
            id: event_id,
            owner_id: insert.owner_id,
            title: insert.title,
            start_time: insert.start_time,
            end_time: insert.end_time,
            status: EventStatus::Busy,
            version: 0,
            created_at: now,
        };
        self.tables.last_event_id = event_id;
        self.tables.events.insert(event_id, event.clone());
        self.undo.push(Undo::EventInserted {
            event_id,
            previous_last_id,
        });
        event
    }

    /// Mutate an event if it is still at `expected_version`.
    ///
    /// The version is bumped after `mutate` runs and the marketplace change
    /// matching the new status is recorded for commit.
    pub fn update_event(
        &mut self,
        event_id: i64,
        expected_version: u64,
        mutate: impl FnOnce(&mut Event),
    ) -> Result<Event, StoreError> {
        let event = self
            .tables
            .events
            .get_mut(&event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        if event.version != expected_version {
            return Err(StoreError::VersionConflict {
                event_id,
                expected: expected_version,
                actual: event.version,
            });
        }
        let before = event.clone();
        mutate(event);
        event.id = event_id;
        event.version = expected_version + 1;
        let after = event.clone();

        self.undo.push(Undo::EventReplaced(before));
        self.changes.push(MarketplaceChange::for_event(&after));
        Ok(after)
    }

    pub fn remove_event(
        &mut self,
        event_id: i64,
        expected_version: u64,
    ) -> Result<Event, StoreError> {
        let actual = self
            .tables
            .events
            .get(&event_id)
            .map(|e| e.version)
            .ok_or(StoreError::EventNotFound(event_id))?;
        if actual != expected_version {
            return Err(StoreError::VersionConflict {
                event_id,
                expected: expected_version,
                actual,
            });
        }
        let removed = self
            .tables
            .events
            .remove(&event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        self.undo.push(Undo::EventRemoved(removed.clone()));
        self.changes.push(MarketplaceChange::Delisted(event_id));
        Ok(removed)
    }

    /// Insert a new PENDING request.
    pub fn insert_request(&mut self, insert: SwapRequestInsert, now: OffsetDateTime) -> SwapRequest {
        let previous_last_id = self.tables.last_request_id;
        let request_id = previous_last_id + 1;
        let request = SwapRequest {
            id: request_id,
            requester_id: insert.requester_id,
            responder_id: insert.responder_id,
            my_slot_id: insert.my_slot_id,
            their_slot_id: insert.their_slot_id,
            status: SwapStatus::Pending,
            created_at: now,
            resolved_at: None,
        };
        self.tables.last_request_id = request_id;
        self.tables.index_request(&request);
        self.tables.requests.insert(request_id, request.clone());
        self.undo.push(Undo::RequestInserted {
            request_id,
            previous_last_id,
        });
        request
    }

    /// Move a PENDING request into a terminal status.
    pub fn resolve_request(
        &mut self,
        request_id: i64,
        status: SwapStatus,
        now: OffsetDateTime,
    ) -> Result<SwapRequest, StoreError> {
        let request = self
            .tables
            .requests
            .get_mut(&request_id)
            .ok_or(StoreError::RequestNotFound(request_id))?;
        if !request.is_pending() {
            return Err(StoreError::RequestNotPending {
                request_id,
                status: request.status,
            });
        }
        let before = request.clone();
        request.status = status;
        request.resolved_at = Some(now);
        let after = request.clone();
        self.undo.push(Undo::RequestReplaced(before));
        Ok(after)
    }

    /// Make every write visible and publish the recorded marketplace changes.
    ///
    /// The index is updated before the write lock is released.
    pub fn commit(mut self) {
        let changes = std::mem::take(&mut self.changes);
        debug!(
            writes = self.undo.len(),
            marketplace_changes = changes.len(),
            "Committing store transaction"
        );
        self.marketplace.apply(changes);
        self.undo.clear();
        self.committed = true;
    }

    fn rollback(&mut self) {
        let tables = &mut *self.tables;
        while let Some(undo) = self.undo.pop() {
            match undo {
                Undo::EventInserted {
                    event_id,
                    previous_last_id,
                } => {
                    tables.events.remove(&event_id);
                    tables.last_event_id = previous_last_id;
                }
                Undo::EventReplaced(event) | Undo::EventRemoved(event) => {
                    tables.events.insert(event.id, event);
                }
                Undo::RequestInserted {
                    request_id,
                    previous_last_id,
                } => {
                    if let Some(request) = tables.requests.remove(&request_id) {
                        tables.unindex_request(&request);
                    }
                    tables.last_request_id = previous_last_id;
                }
                Undo::RequestReplaced(request) => {
                    tables.requests.insert(request.id, request);
                }
            }
        }
    }
}

impl Deref for Transaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.tables
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.undo.is_empty() {
            debug!(writes = self.undo.len(), "Rolling back store transaction");
            self.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::MemoryStore;
    use super::*;
    use time::Duration;

    fn insert(owner_id: i64) -> EventInsert {
        let start = OffsetDateTime::UNIX_EPOCH + Duration::days(1);
        EventInsert {
            owner_id,
            title: "standup".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(30),
        }
    }

    #[tokio::test]
    async fn commit_keeps_writes_and_updates_marketplace() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        let event = tx.insert_event(insert(1), OffsetDateTime::UNIX_EPOCH);
        let event = tx
            .update_event(event.id, 0, |e| e.status = EventStatus::Swappable)
            .expect("update");
        assert_eq!(event.version, 1);
        assert!(!store.marketplace().contains(event.id));
        tx.commit();

        assert!(store.marketplace().contains(event.id));
        let tables = store.read().await;
        assert_eq!(tables.event(event.id).map(|e| e.version), Some(1));
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        let a = tx.insert_event(insert(1), OffsetDateTime::UNIX_EPOCH);
        let b = tx.insert_event(insert(2), OffsetDateTime::UNIX_EPOCH);
        tx.update_event(a.id, 0, |e| e.status = EventStatus::Swappable)
            .expect("update a");
        tx.update_event(b.id, 0, |e| e.status = EventStatus::Swappable)
            .expect("update b");
        tx.commit();

        {
            let mut tx = store.begin().await;
            let request = tx.insert_request(
                SwapRequestInsert {
                    requester_id: 1,
                    responder_id: 2,
                    my_slot_id: a.id,
                    their_slot_id: b.id,
                },
                OffsetDateTime::UNIX_EPOCH,
            );
            tx.resolve_request(request.id, SwapStatus::Accepted, OffsetDateTime::UNIX_EPOCH)
                .expect("resolve");
            tx.update_event(a.id, 1, |e| {
                e.owner_id = 2;
                e.status = EventStatus::Busy;
            })
            .expect("transfer a");
            tx.remove_event(b.id, 1).expect("remove b");
        }

        let tables = store.read().await;
        assert_eq!(tables.requests().count(), 0);
        assert!(!tables.has_pending_reference(a.id));
        let a_now = tables.event(a.id).expect("a survives");
        assert_eq!((a_now.owner_id, a_now.version), (1, 1));
        assert!(tables.event(b.id).is_some());
        assert!(store.marketplace().contains(a.id));
        assert!(store.marketplace().contains(b.id));
        drop(tables);

        // Rolled-back ids are reused by the next insert.
        let mut tx = store.begin().await;
        let c = tx.insert_event(insert(3), OffsetDateTime::UNIX_EPOCH);
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        let event = tx.insert_event(insert(1), OffsetDateTime::UNIX_EPOCH);
        let err = tx
            .update_event(event.id, 5, |e| e.title = "x".into())
            .expect_err("stale");
        assert_eq!(
            err,
            StoreError::VersionConflict {
                event_id: event.id,
                expected: 5,
                actual: 0
            }
        );
    }

    #[tokio::test]
    async fn resolving_twice_fails() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        let request = tx.insert_request(
            SwapRequestInsert {
                requester_id: 1,
                responder_id: 2,
                my_slot_id: 1,
                their_slot_id: 2,
            },
            OffsetDateTime::UNIX_EPOCH,
        );
        tx.resolve_request(request.id, SwapStatus::Rejected, OffsetDateTime::UNIX_EPOCH)
            .expect("first");
        let err = tx
            .resolve_request(request.id, SwapStatus::Accepted, OffsetDateTime::UNIX_EPOCH)
            .expect_err("second");
        assert!(matches!(err, StoreError::RequestNotPending { .. }));
    }
}
