use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle state of a swap request.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

/// Request payload for proposing a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposeSwapRequest {
    /// A SWAPPABLE event owned by the caller.
    pub my_slot_id: i64,
    /// A SWAPPABLE event owned by someone else.
    pub their_slot_id: i64,
}

/// Request payload for answering an incoming swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RespondSwapRequest {
    pub accept: bool,
}

/// A swap request as returned by every swap endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequestResponse {
    pub id: i64,
    pub requester_id: i64,
    pub my_slot_id: i64,
    pub their_slot_id: i64,
    pub status: SwapStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub resolved_at: Option<OffsetDateTime>,
}
