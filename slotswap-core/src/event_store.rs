//! Event Store: ownership and availability of calendar events.
//!
//! Each operation is an input struct handled through
//! [`kanau::processor::Processor`]. Validation runs against a read snapshot;
//! the write re-checks the version inside a store transaction.

use crate::entities::{Event, EventInsert, EventStatus};
use crate::error::SwapError;
use crate::store::{MemoryStore, StoreError, Transaction};
use kanau::processor::Processor;
use time::OffsetDateTime;
use tracing::info;

#[derive(Clone)]
pub struct EventStore {
    store: MemoryStore,
}

impl EventStore {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Read an event the caller must own.
    async fn owned_snapshot(&self, event_id: i64, requester_id: i64) -> Result<Event, SwapError> {
        let tables = self.store.read().await;
        let event = tables
            .event(event_id)
            .ok_or_else(|| SwapError::event_not_found(event_id))?;
        if event.owner_id != requester_id {
            return Err(SwapError::Forbidden(format!(
                "event {event_id} is not owned by user {requester_id}"
            )));
        }
        Ok(event.clone())
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub owner_id: i64,
    pub title: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}

impl Processor<CreateEvent> for EventStore {
    type Output = Event;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "EventStore:CreateEvent")]
    async fn process(&self, create: CreateEvent) -> Result<Event, SwapError> {
        if create.end_time <= create.start_time {
            return Err(SwapError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        let title = create.title.trim();
        if title.is_empty() {
            return Err(SwapError::Validation("title must not be blank".to_string()));
        }

        let mut tx = self.store.begin().await;
        let event = tx.insert_event(
            EventInsert {
                owner_id: create.owner_id,
                title: title.to_string(),
                start_time: create.start_time,
                end_time: create.end_time,
            },
            OffsetDateTime::now_utc(),
        );
        tx.commit();

        info!(event_id = event.id, owner_id = event.owner_id, "Event created");
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetSwappable {
    pub event_id: i64,
    pub requester_id: i64,
}

impl Processor<SetSwappable> for EventStore {
    type Output = Event;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "EventStore:SetSwappable")]
    async fn process(&self, input: SetSwappable) -> Result<Event, SwapError> {
        let snapshot = self
            .owned_snapshot(input.event_id, input.requester_id)
            .await?;
        if snapshot.is_swappable() {
            return Ok(snapshot);
        }

        let mut tx = self.store.begin().await;
        let event = tx.update_event(snapshot.id, snapshot.version, |e| {
            e.status = EventStatus::Swappable;
        })?;
        tx.commit();

        info!(event_id = event.id, version = event.version, "Event listed as swappable");
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetBusy {
    pub event_id: i64,
    pub requester_id: i64,
}

impl Processor<SetBusy> for EventStore {
    type Output = Event;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "EventStore:SetBusy")]
    async fn process(&self, input: SetBusy) -> Result<Event, SwapError> {
        let snapshot = self
            .owned_snapshot(input.event_id, input.requester_id)
            .await?;
        if !snapshot.is_swappable() {
            return Ok(snapshot);
        }

        let mut tx = self.store.begin().await;
        ensure_unreferenced(&tx, snapshot.id)?;
        let event = tx.update_event(snapshot.id, snapshot.version, |e| {
            e.status = EventStatus::Busy;
        })?;
        tx.commit();

        info!(event_id = event.id, version = event.version, "Event withdrawn from marketplace");
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteEvent {
    pub event_id: i64,
    pub requester_id: i64,
}

impl Processor<DeleteEvent> for EventStore {
    type Output = ();
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "EventStore:DeleteEvent")]
    async fn process(&self, input: DeleteEvent) -> Result<(), SwapError> {
        let snapshot = self
            .owned_snapshot(input.event_id, input.requester_id)
            .await?;

        let mut tx = self.store.begin().await;
        ensure_unreferenced(&tx, snapshot.id)?;
        tx.remove_event(snapshot.id, snapshot.version)?;
        tx.commit();

        info!(event_id = snapshot.id, owner_id = snapshot.owner_id, "Event deleted");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetEvent {
    pub event_id: i64,
}

impl Processor<GetEvent> for EventStore {
    type Output = Event;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "EventStore:GetEvent")]
    async fn process(&self, query: GetEvent) -> Result<Event, SwapError> {
        self.store
            .read()
            .await
            .event(query.event_id)
            .cloned()
            .ok_or_else(|| SwapError::event_not_found(query.event_id))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListOwnedEvents {
    pub owner_id: i64,
}

impl Processor<ListOwnedEvents> for EventStore {
    type Output = Vec<Event>;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "EventStore:ListOwnedEvents")]
    async fn process(&self, query: ListOwnedEvents) -> Result<Vec<Event>, SwapError> {
        let tables = self.store.read().await;
        Ok(tables.events_owned_by(query.owner_id).cloned().collect())
    }
}

fn ensure_unreferenced(tx: &Transaction<'_>, event_id: i64) -> Result<(), SwapError> {
    if tx.has_pending_reference(event_id) {
        return Err(SwapError::Conflict(format!(
            "event {event_id} is referenced by a pending swap request"
        )));
    }
    Ok(())
}

/// Swap the owners of two events within the caller's transaction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OwnershipTransfer {
    pub event_a: i64,
    pub event_b: i64,
    pub new_owner_a: i64,
    pub new_owner_b: i64,
    pub expected_version_a: u64,
    pub expected_version_b: u64,
}

/// Both events end up BUSY with their versions bumped. Any stale version
/// fails the whole transfer; the caller's transaction rolls back on drop.
pub(crate) fn transfer_ownership(
    tx: &mut Transaction<'_>,
    transfer: OwnershipTransfer,
) -> Result<(Event, Event), StoreError> {
    if transfer.event_a == transfer.event_b {
        return Err(StoreError::SelfTransfer(transfer.event_a));
    }
    let a = tx.update_event(transfer.event_a, transfer.expected_version_a, |e| {
        e.owner_id = transfer.new_owner_a;
        e.status = EventStatus::Busy;
    })?;
    let b = tx.update_event(transfer.event_b, transfer.expected_version_b, |e| {
        e.owner_id = transfer.new_owner_b;
        e.status = EventStatus::Busy;
    })?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn store() -> (MemoryStore, EventStore) {
        let store = MemoryStore::new();
        (store.clone(), EventStore::new(store))
    }

    fn create(owner_id: i64) -> CreateEvent {
        let start = OffsetDateTime::UNIX_EPOCH + Duration::days(30);
        CreateEvent {
            owner_id,
            title: "  Focus block ".to_string(),
            start_time: start,
            end_time: start + Duration::hours(2),
        }
    }

    #[tokio::test]
    async fn create_starts_busy_at_version_zero() {
        let (_, events) = store();
        let event = events.process(create(1)).await.unwrap();
        assert_eq!(event.status, EventStatus::Busy);
        assert_eq!(event.version, 0);
        assert_eq!(event.title, "Focus block");
    }

    #[tokio::test]
    async fn create_rejects_inverted_interval() {
        let (_, events) = store();
        let mut input = create(1);
        input.end_time = input.start_time;
        let err = events.process(input).await.unwrap_err();
        assert!(matches!(err, SwapError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let (_, events) = store();
        let mut input = create(1);
        input.title = "   ".to_string();
        assert!(matches!(
            events.process(input).await,
            Err(SwapError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn set_swappable_lists_and_is_idempotent() {
        let (store, events) = store();
        let event = events.process(create(1)).await.unwrap();
        let input = SetSwappable {
            event_id: event.id,
            requester_id: 1,
        };
        let first = events.process(input).await.unwrap();
        let second = events.process(input).await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 1);
        assert!(store.marketplace().contains(event.id));
    }

    #[tokio::test]
    async fn only_the_owner_may_toggle() {
        let (_, events) = store();
        let event = events.process(create(1)).await.unwrap();
        let err = events
            .process(SetSwappable {
                event_id: event.id,
                requester_id: 2,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::Forbidden(_)));

        let err = events
            .process(SetSwappable {
                event_id: 99,
                requester_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::NotFound(_)));
    }

    #[tokio::test]
    async fn set_busy_delists() {
        let (store, events) = store();
        let event = events.process(create(1)).await.unwrap();
        events
            .process(SetSwappable {
                event_id: event.id,
                requester_id: 1,
            })
            .await
            .unwrap();
        let busy = events
            .process(SetBusy {
                event_id: event.id,
                requester_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(busy.status, EventStatus::Busy);
        assert_eq!(busy.version, 2);
        assert!(store.marketplace().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_event_and_listing() {
        let (store, events) = store();
        let event = events.process(create(1)).await.unwrap();
        events
            .process(SetSwappable {
                event_id: event.id,
                requester_id: 1,
            })
            .await
            .unwrap();
        events
            .process(DeleteEvent {
                event_id: event.id,
                requester_id: 1,
            })
            .await
            .unwrap();
        assert!(!store.marketplace().contains(event.id));
        assert!(matches!(
            events.process(GetEvent { event_id: event.id }).await,
            Err(SwapError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_owned_is_ordered_by_id() {
        let (_, events) = store();
        let a = events.process(create(1)).await.unwrap();
        events.process(create(2)).await.unwrap();
        let b = events.process(create(1)).await.unwrap();
        let owned: Vec<i64> = events
            .process(ListOwnedEvents { owner_id: 1 })
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(owned, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn transfer_rejects_stale_version() {
        let (store, events) = store();
        let a = events.process(create(1)).await.unwrap();
        let b = events.process(create(2)).await.unwrap();

        let mut tx = store.begin().await;
        let err = transfer_ownership(
            &mut tx,
            OwnershipTransfer {
                event_a: a.id,
                event_b: b.id,
                new_owner_a: 2,
                new_owner_b: 1,
                expected_version_a: 0,
                expected_version_b: 7,
            },
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { event_id, .. } if event_id == b.id));
        drop(tx);

        let tables = store.read().await;
        assert_eq!(tables.event(a.id).map(|e| e.owner_id), Some(1));
    }
}
