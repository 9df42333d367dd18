//! Swap Request Coordinator.
//!
//! Owns the swap request state machine:
//!
//! ```text
//! (none) --propose--> PENDING --accept--> ACCEPTED
//!                     PENDING --reject--> REJECTED
//!                     PENDING --cancel--> CANCELLED
//! ```
//!
//! Accepting a request exchanges the owners of both slots, resolves the
//! request and cancels every other PENDING request on either slot, all in
//! one store transaction. Events for the notifier are emitted only after
//! the transaction has committed.

use crate::entities::{Event, SwapRequest, SwapRequestInsert, SwapStatus};
use crate::error::SwapError;
use crate::event_store::{transfer_ownership, OwnershipTransfer};
use crate::events::{CancelReason, SwapEvent, SwapEventSender};
use crate::store::{MemoryStore, Tables};
use kanau::processor::Processor;
use std::collections::BTreeSet;
use time::OffsetDateTime;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct SwapCoordinator {
    store: MemoryStore,
    event_tx: SwapEventSender,
}

impl SwapCoordinator {
    pub fn new(store: MemoryStore, event_tx: SwapEventSender) -> Self {
        Self { store, event_tx }
    }

    fn emit(&self, event: SwapEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(event = ?event, "SwapEvent channel full, notification dropped");
            }
            Err(TrySendError::Closed(event)) => {
                debug!(event = ?event, "Notifier stopped, notification dropped");
            }
        }
    }

    /// Cancel a request whose slots turned out to be unavailable at accept
    /// time, then report the slot that failed.
    async fn cancel_stale(&self, request_id: i64, slot_id: i64) -> Result<SwapRequest, SwapError> {
        let mut tx = self.store.begin().await;
        let request = tx
            .request(request_id)
            .cloned()
            .ok_or_else(|| SwapError::request_not_found(request_id))?;
        if !request.is_pending() {
            return Err(SwapError::Conflict(format!(
                "swap request {request_id} was resolved concurrently"
            )));
        }
        if unavailable_slot(&tx, &request).is_none() {
            return Err(SwapError::Conflict(format!(
                "slots of swap request {request_id} changed concurrently"
            )));
        }
        let cancelled = tx.resolve_request(request_id, SwapStatus::Cancelled, OffsetDateTime::now_utc())?;
        tx.commit();

        info!(request_id, slot_id, "Stale swap request cancelled at accept");
        self.emit(SwapEvent::Cancelled {
            request_id,
            requester_id: cancelled.requester_id,
            reason: CancelReason::SlotNoLongerAvailable,
        });
        Err(SwapError::Unavailable(slot_id))
    }

    async fn reject(&self, request: SwapRequest) -> Result<SwapRequest, SwapError> {
        let mut tx = self.store.begin().await;
        let rejected = tx.resolve_request(request.id, SwapStatus::Rejected, OffsetDateTime::now_utc())?;
        tx.commit();

        info!(request_id = rejected.id, "Swap request rejected");
        self.emit(SwapEvent::Rejected {
            request_id: rejected.id,
            requester_id: rejected.requester_id,
        });
        Ok(rejected)
    }

    async fn accept(
        &self,
        request: SwapRequest,
        my_slot: Option<Event>,
        their_slot: Event,
    ) -> Result<SwapRequest, SwapError> {
        let marketplace = self.store.marketplace();
        let my_slot = match my_slot {
            Some(slot)
                if slot.is_swappable()
                    && slot.owner_id == request.requester_id
                    && marketplace.contains(slot.id) =>
            {
                slot
            }
            _ => return self.cancel_stale(request.id, request.my_slot_id).await,
        };
        if !(their_slot.is_swappable() && marketplace.contains(their_slot.id)) {
            return self.cancel_stale(request.id, request.their_slot_id).await;
        }

        let now = OffsetDateTime::now_utc();
        let mut tx = self.store.begin().await;
        let accepted = tx.resolve_request(request.id, SwapStatus::Accepted, now)?;
        transfer_ownership(
            &mut tx,
            OwnershipTransfer {
                event_a: my_slot.id,
                event_b: their_slot.id,
                new_owner_a: their_slot.owner_id,
                new_owner_b: request.requester_id,
                expected_version_a: my_slot.version,
                expected_version_b: their_slot.version,
            },
        )?;

        let losers: BTreeSet<i64> = [my_slot.id, their_slot.id]
            .into_iter()
            .flat_map(|event_id| tx.pending_requests_referencing(event_id).map(|r| r.id))
            .collect();
        let mut cancelled = Vec::with_capacity(losers.len());
        for loser_id in losers {
            cancelled.push(tx.resolve_request(loser_id, SwapStatus::Cancelled, now)?);
        }
        tx.commit();

        info!(
            request_id = accepted.id,
            my_slot_id = my_slot.id,
            their_slot_id = their_slot.id,
            cascaded = cancelled.len(),
            "Swap request accepted, ownership exchanged"
        );
        self.emit(SwapEvent::Accepted {
            request_id: accepted.id,
            requester_id: accepted.requester_id,
        });
        for request in cancelled {
            self.emit(SwapEvent::Cancelled {
                request_id: request.id,
                requester_id: request.requester_id,
                reason: CancelReason::SlotNoLongerAvailable,
            });
        }
        Ok(accepted)
    }
}

/// The first slot of `request` that can no longer be traded, if any.
fn unavailable_slot(tables: &Tables, request: &SwapRequest) -> Option<i64> {
    let my_ok = tables
        .event(request.my_slot_id)
        .is_some_and(|e| e.is_swappable() && e.owner_id == request.requester_id);
    if !my_ok {
        return Some(request.my_slot_id);
    }
    let their_ok = tables
        .event(request.their_slot_id)
        .is_some_and(|e| e.is_swappable());
    (!their_ok).then_some(request.their_slot_id)
}

fn current_owner(tables: &Tables, event_id: i64) -> Option<i64> {
    tables.event(event_id).map(|e| e.owner_id)
}

#[derive(Debug, Clone, Copy)]
pub struct ProposeSwap {
    pub requester_id: i64,
    pub my_slot_id: i64,
    pub their_slot_id: i64,
}

impl Processor<ProposeSwap> for SwapCoordinator {
    type Output = SwapRequest;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "SwapCoordinator:ProposeSwap")]
    async fn process(&self, input: ProposeSwap) -> Result<SwapRequest, SwapError> {
        let mut tx = self.store.begin().await;
        let my_slot = tx
            .event(input.my_slot_id)
            .cloned()
            .ok_or_else(|| SwapError::event_not_found(input.my_slot_id))?;
        let their_slot = tx
            .event(input.their_slot_id)
            .cloned()
            .ok_or_else(|| SwapError::event_not_found(input.their_slot_id))?;

        if my_slot.owner_id != input.requester_id {
            return Err(SwapError::Forbidden(format!(
                "event {} is not owned by user {}",
                my_slot.id, input.requester_id
            )));
        }
        if !my_slot.is_swappable() {
            return Err(SwapError::Unavailable(my_slot.id));
        }
        if !their_slot.is_swappable() {
            return Err(SwapError::Unavailable(their_slot.id));
        }
        if their_slot.owner_id == input.requester_id {
            return Err(SwapError::Validation(
                "cannot request a swap with your own slot".to_string(),
            ));
        }
        let duplicate = tx.pending_requests_referencing(my_slot.id).any(|r| {
            r.requester_id == input.requester_id
                && r.my_slot_id == my_slot.id
                && r.their_slot_id == their_slot.id
        });
        if duplicate {
            return Err(SwapError::Duplicate(format!(
                "a pending request for events {} and {} already exists",
                my_slot.id, their_slot.id
            )));
        }

        let request = tx.insert_request(
            SwapRequestInsert {
                requester_id: input.requester_id,
                responder_id: their_slot.owner_id,
                my_slot_id: my_slot.id,
                their_slot_id: their_slot.id,
            },
            OffsetDateTime::now_utc(),
        );
        tx.commit();

        info!(
            request_id = request.id,
            requester_id = request.requester_id,
            responder_id = request.responder_id,
            "Swap request proposed"
        );
        self.emit(SwapEvent::Proposed {
            request_id: request.id,
            responder_id: request.responder_id,
        });
        Ok(request)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RespondToSwap {
    pub request_id: i64,
    pub responder_id: i64,
    pub accept: bool,
}

impl Processor<RespondToSwap> for SwapCoordinator {
    type Output = SwapRequest;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "SwapCoordinator:RespondToSwap")]
    async fn process(&self, input: RespondToSwap) -> Result<SwapRequest, SwapError> {
        let (request, my_slot, their_slot) = {
            let tables = self.store.read().await;
            let request = tables
                .request(input.request_id)
                .cloned()
                .ok_or_else(|| SwapError::request_not_found(input.request_id))?;
            if !request.is_pending() {
                return Err(SwapError::Conflict(format!(
                    "swap request {} is already {:?}",
                    request.id, request.status
                )));
            }
            let their_slot = tables
                .event(request.their_slot_id)
                .filter(|e| e.owner_id == input.responder_id)
                .cloned()
                .ok_or_else(|| {
                    SwapError::Forbidden(format!(
                        "user {} does not own event {}",
                        input.responder_id, request.their_slot_id
                    ))
                })?;
            let my_slot = tables.event(request.my_slot_id).cloned();
            (request, my_slot, their_slot)
        };

        if input.accept {
            self.accept(request, my_slot, their_slot).await
        } else {
            self.reject(request).await
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CancelSwap {
    pub request_id: i64,
    pub requester_id: i64,
}

impl Processor<CancelSwap> for SwapCoordinator {
    type Output = SwapRequest;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "SwapCoordinator:CancelSwap")]
    async fn process(&self, input: CancelSwap) -> Result<SwapRequest, SwapError> {
        let mut tx = self.store.begin().await;
        let request = tx
            .request(input.request_id)
            .cloned()
            .ok_or_else(|| SwapError::request_not_found(input.request_id))?;
        if request.requester_id != input.requester_id {
            return Err(SwapError::Forbidden(format!(
                "swap request {} was not made by user {}",
                request.id, input.requester_id
            )));
        }
        let cancelled = tx.resolve_request(request.id, SwapStatus::Cancelled, OffsetDateTime::now_utc())?;
        let owner_id = current_owner(&tx, cancelled.their_slot_id);
        tx.commit();

        info!(request_id = cancelled.id, "Swap request withdrawn by requester");
        if let Some(owner_id) = owner_id {
            self.emit(SwapEvent::Withdrawn {
                request_id: cancelled.id,
                owner_id,
            });
        }
        Ok(cancelled)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSwapRequest {
    pub request_id: i64,
    pub viewer_id: i64,
}

impl Processor<GetSwapRequest> for SwapCoordinator {
    type Output = SwapRequest;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "SwapCoordinator:GetSwapRequest")]
    async fn process(&self, query: GetSwapRequest) -> Result<SwapRequest, SwapError> {
        let tables = self.store.read().await;
        let request = tables
            .request(query.request_id)
            .ok_or_else(|| SwapError::request_not_found(query.request_id))?;
        let visible = request.requester_id == query.viewer_id
            || current_owner(&tables, request.their_slot_id) == Some(query.viewer_id);
        if !visible {
            return Err(SwapError::Forbidden(format!(
                "swap request {} is not visible to user {}",
                request.id, query.viewer_id
            )));
        }
        Ok(request.clone())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListIncomingSwaps {
    pub user_id: i64,
}

impl Processor<ListIncomingSwaps> for SwapCoordinator {
    type Output = Vec<SwapRequest>;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "SwapCoordinator:ListIncomingSwaps")]
    async fn process(&self, query: ListIncomingSwaps) -> Result<Vec<SwapRequest>, SwapError> {
        let tables = self.store.read().await;
        let mut incoming: Vec<SwapRequest> = tables
            .events_owned_by(query.user_id)
            .flat_map(|event| {
                tables
                    .pending_requests_referencing(event.id)
                    .filter(move |r| r.their_slot_id == event.id)
            })
            .cloned()
            .collect();
        incoming.sort_unstable_by_key(|r| r.id);
        Ok(incoming)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListOutgoingSwaps {
    pub user_id: i64,
}

impl Processor<ListOutgoingSwaps> for SwapCoordinator {
    type Output = Vec<SwapRequest>;
    type Error = SwapError;
    #[tracing::instrument(skip_all, err, name = "SwapCoordinator:ListOutgoingSwaps")]
    async fn process(&self, query: ListOutgoingSwaps) -> Result<Vec<SwapRequest>, SwapError> {
        let tables = self.store.read().await;
        Ok(tables
            .requests()
            .filter(|r| r.requester_id == query.user_id)
            .cloned()
            .collect())
    }
}
