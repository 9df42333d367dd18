//! In-memory transactional store for events and swap requests.
//!
//! Writers are serialized through a single async write lock; each
//! [`Transaction`] keeps an undo log and rolls back on drop unless it was
//! committed. Readers take the shared lock and clone what they need, so a
//! reader never observes a transaction midway.

mod transaction;

pub use transaction::Transaction;

use crate::entities::{Event, SwapRequest, SwapStatus};
use crate::marketplace::MarketplaceIndex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("event {0} not found")]
    EventNotFound(i64),

    #[error("swap request {0} not found")]
    RequestNotFound(i64),

    /// The record changed since the caller read it.
    #[error("event {event_id} changed concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        event_id: i64,
        expected: u64,
        actual: u64,
    },

    #[error("swap request {request_id} is already {status:?}")]
    RequestNotPending {
        request_id: i64,
        status: SwapStatus,
    },

    #[error("cannot transfer event {0} with itself")]
    SelfTransfer(i64),
}

/// The persisted records.
///
/// Ids are assigned in ascending order starting at 1. A rolled-back
/// transaction releases the ids it allocated, so the next insert reuses them.
#[derive(Debug, Default)]
pub struct Tables {
    events: BTreeMap<i64, Event>,
    requests: BTreeMap<i64, SwapRequest>,
    /// Event id to the ids of every request that names it on either side.
    requests_by_event: HashMap<i64, BTreeSet<i64>>,
    last_event_id: i64,
    last_request_id: i64,
}

impl Tables {
    pub fn event(&self, event_id: i64) -> Option<&Event> {
        self.events.get(&event_id)
    }

    /// All events ordered by id.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn events_owned_by(&self, owner_id: i64) -> impl Iterator<Item = &Event> {
        self.events.values().filter(move |e| e.owner_id == owner_id)
    }

    pub fn request(&self, request_id: i64) -> Option<&SwapRequest> {
        self.requests.get(&request_id)
    }

    /// All requests ordered by id.
    pub fn requests(&self) -> impl Iterator<Item = &SwapRequest> {
        self.requests.values()
    }

    /// Requests naming `event_id` on either side, ordered by id.
    pub fn requests_referencing(&self, event_id: i64) -> impl Iterator<Item = &SwapRequest> {
        self.requests_by_event
            .get(&event_id)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.requests.get(id))
    }

    pub fn pending_requests_referencing(
        &self,
        event_id: i64,
    ) -> impl Iterator<Item = &SwapRequest> {
        self.requests_referencing(event_id).filter(|r| r.is_pending())
    }

    pub fn has_pending_reference(&self, event_id: i64) -> bool {
        self.pending_requests_referencing(event_id).next().is_some()
    }

    fn index_request(&mut self, request: &SwapRequest) {
        for event_id in [request.my_slot_id, request.their_slot_id] {
            self.requests_by_event
                .entry(event_id)
                .or_default()
                .insert(request.id);
        }
    }

    fn unindex_request(&mut self, request: &SwapRequest) {
        for event_id in [request.my_slot_id, request.their_slot_id] {
            if let Some(ids) = self.requests_by_event.get_mut(&event_id) {
                ids.remove(&request.id);
                if ids.is_empty() {
                    self.requests_by_event.remove(&event_id);
                }
            }
        }
    }
}

struct StoreInner {
    tables: RwLock<Tables>,
    marketplace: MarketplaceIndex,
}

/// Shared handle to the store. Cloning is cheap.
///
/// Every write transaction takes the same lock, so writers to unrelated
/// events still queue behind each other. Transactions are short and never
/// await while holding the lock, but per-event locking would be needed to
/// let unrelated writes proceed in parallel.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                tables: RwLock::new(Tables::default()),
                marketplace: MarketplaceIndex::new(),
            }),
        }
    }

    /// Shared read access. Hold it only long enough to copy what you need.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.tables.read().await
    }

    /// Start a write transaction. Waits for any other writer to finish.
    pub async fn begin(&self) -> Transaction<'_> {
        let tables = self.inner.tables.write().await;
        Transaction::new(tables, &self.inner.marketplace)
    }

    /// The index kept in lockstep with this store's events.
    pub fn marketplace(&self) -> &MarketplaceIndex {
        &self.inner.marketplace
    }

    /// Recompute the marketplace index from the event table.
    pub async fn rebuild_marketplace(&self) {
        let tables = self.read().await;
        self.inner.marketplace.rebuild(tables.events());
    }
}
