use slotswap_sdk::objects::{SwapRequestResponse, SwapStatus as SdkSwapStatus};
use time::OffsetDateTime;

/// Lifecycle state of a swap request.
///
/// For API/DTO use, see `slotswap_sdk::objects::SwapStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl From<SwapStatus> for SdkSwapStatus {
    fn from(value: SwapStatus) -> Self {
        match value {
            SwapStatus::Pending => SdkSwapStatus::Pending,
            SwapStatus::Accepted => SdkSwapStatus::Accepted,
            SwapStatus::Rejected => SdkSwapStatus::Rejected,
            SwapStatus::Cancelled => SdkSwapStatus::Cancelled,
        }
    }
}

impl From<SdkSwapStatus> for SwapStatus {
    fn from(value: SdkSwapStatus) -> Self {
        match value {
            SdkSwapStatus::Pending => SwapStatus::Pending,
            SdkSwapStatus::Accepted => SwapStatus::Accepted,
            SdkSwapStatus::Rejected => SwapStatus::Rejected,
            SdkSwapStatus::Cancelled => SwapStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub id: i64,
    pub requester_id: i64,
    /// Owner of `their_slot_id` when the request was proposed; the proposal
    /// notification goes to this user. Authorization and visibility always
    /// use the current owner.
    pub responder_id: i64,
    /// Offered by the requester.
    pub my_slot_id: i64,
    /// Wanted by the requester.
    pub their_slot_id: i64,
    pub status: SwapStatus,
    pub created_at: OffsetDateTime,
    pub resolved_at: Option<OffsetDateTime>,
}

impl SwapRequest {
    pub fn is_pending(&self) -> bool {
        self.status == SwapStatus::Pending
    }
}

impl From<&SwapRequest> for SwapRequestResponse {
    fn from(request: &SwapRequest) -> Self {
        SwapRequestResponse {
            id: request.id,
            requester_id: request.requester_id,
            my_slot_id: request.my_slot_id,
            their_slot_id: request.their_slot_id,
            status: request.status.into(),
            created_at: request.created_at,
            resolved_at: request.resolved_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequestInsert {
    pub requester_id: i64,
    pub responder_id: i64,
    pub my_slot_id: i64,
    pub their_slot_id: i64,
}
