use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// What happened to trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone proposed a swap for one of your slots.
    SwapRequested,
    /// Your proposal was accepted; ownership has been exchanged.
    SwapAccepted,
    /// Your proposal was rejected.
    SwapRejected,
    /// Your proposal was cancelled because a slot was traded away.
    SwapCancelled,
    /// A proposal you received was withdrawn by its requester.
    SwapWithdrawn,
}

/// A notification as pushed over the WebSocket stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Unique per notification; identical across a user's sessions so that
    /// clients with several tabs can de-duplicate.
    pub id: Uuid,
    pub kind: NotificationKind,
    pub request_id: i64,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
