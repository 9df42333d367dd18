//! Swap lifecycle events.
//!
//! Events are emitted after the store transaction that caused them has
//! committed. They carry the recipient and the request id only; the
//! notifier renders the message.

/// Why a PENDING request was cancelled by the engine rather than by its
/// requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Another swap took one of the slots, or the slot left the marketplace
    /// before the request could be accepted.
    SlotNoLongerAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapEvent {
    /// A new request arrived for a slot owned by `responder_id`.
    Proposed { request_id: i64, responder_id: i64 },
    Accepted { request_id: i64, requester_id: i64 },
    Rejected { request_id: i64, requester_id: i64 },
    /// The engine cancelled the requester's PENDING request.
    Cancelled {
        request_id: i64,
        requester_id: i64,
        reason: CancelReason,
    },
    /// The requester withdrew their own offer; `owner_id` held the wanted
    /// slot at that moment.
    Withdrawn { request_id: i64, owner_id: i64 },
}

impl SwapEvent {
    /// The user who should hear about this event.
    pub fn recipient(&self) -> i64 {
        match self {
            SwapEvent::Proposed { responder_id, .. } => *responder_id,
            SwapEvent::Accepted { requester_id, .. }
            | SwapEvent::Rejected { requester_id, .. }
            | SwapEvent::Cancelled { requester_id, .. } => *requester_id,
            SwapEvent::Withdrawn { owner_id, .. } => *owner_id,
        }
    }

    pub fn request_id(&self) -> i64 {
        match self {
            SwapEvent::Proposed { request_id, .. }
            | SwapEvent::Accepted { request_id, .. }
            | SwapEvent::Rejected { request_id, .. }
            | SwapEvent::Cancelled { request_id, .. }
            | SwapEvent::Withdrawn { request_id, .. } => *request_id,
        }
    }
}
