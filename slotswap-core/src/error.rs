//! Error taxonomy reported synchronously by every mutating operation.

use crate::store::StoreError;
use slotswap_sdk::objects::ErrorKind;
use thiserror::Error;

/// Errors returned by the Event Store and the Swap Coordinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// Malformed input. Not retryable without changing the input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller is not allowed to act on this resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Valid request, but current state forbids it (already resolved,
    /// pending references, or a concurrent write won the race).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced slot is no longer SWAPPABLE.
    #[error("slot {0} is no longer available")]
    Unavailable(i64),

    /// The same requester already has a PENDING request for this pair.
    #[error("duplicate: {0}")]
    Duplicate(String),
}

impl SwapError {
    pub fn event_not_found(event_id: i64) -> Self {
        Self::NotFound(format!("event {event_id}"))
    }

    pub fn request_not_found(request_id: i64) -> Self {
        Self::NotFound(format!("swap request {request_id}"))
    }

    /// Only conflicts may succeed on retry after the caller re-reads state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwapError::Conflict(_))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::Validation(_) => ErrorKind::Validation,
            SwapError::Forbidden(_) => ErrorKind::Forbidden,
            SwapError::NotFound(_) => ErrorKind::NotFound,
            SwapError::Conflict(_) => ErrorKind::Conflict,
            SwapError::Unavailable(_) => ErrorKind::Unavailable,
            SwapError::Duplicate(_) => ErrorKind::Duplicate,
        }
    }
}

impl From<StoreError> for SwapError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EventNotFound(id) => SwapError::event_not_found(id),
            StoreError::RequestNotFound(id) => SwapError::request_not_found(id),
            StoreError::SelfTransfer(_) => SwapError::Validation(err.to_string()),
            StoreError::VersionConflict { .. } | StoreError::RequestNotPending { .. } => {
                SwapError::Conflict(err.to_string())
            }
        }
    }
}
