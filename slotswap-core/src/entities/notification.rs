use slotswap_sdk::objects::{NotificationKind, NotificationMessage};
use time::OffsetDateTime;
use uuid::Uuid;

/// An ephemeral message on its way to one user's connected channels.
///
/// Never persisted; dropped if the user has no open channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub request_id: i64,
    pub message: String,
    pub created_at: OffsetDateTime,
}

impl Notification {
    pub fn new(
        user_id: i64,
        kind: NotificationKind,
        request_id: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            kind,
            request_id,
            message: message.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl From<&Notification> for NotificationMessage {
    fn from(n: &Notification) -> Self {
        NotificationMessage {
            id: n.id,
            kind: n.kind,
            request_id: n.request_id,
            message: n.message.clone(),
            created_at: n.created_at,
        }
    }
}
