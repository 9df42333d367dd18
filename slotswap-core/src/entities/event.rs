use slotswap_sdk::objects::{EventResponse, EventStatus as SdkEventStatus};
use time::OffsetDateTime;

/// Availability of a calendar event.
///
/// For API/DTO use, see `slotswap_sdk::objects::EventStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Default state. The slot is not offered to anyone.
    Busy,
    /// The owner has opted the slot into the marketplace.
    Swappable,
}

impl From<EventStatus> for SdkEventStatus {
    fn from(value: EventStatus) -> Self {
        match value {
            EventStatus::Busy => SdkEventStatus::Busy,
            EventStatus::Swappable => SdkEventStatus::Swappable,
        }
    }
}

impl From<SdkEventStatus> for EventStatus {
    fn from(value: SdkEventStatus) -> Self {
        match value {
            SdkEventStatus::Busy => EventStatus::Busy,
            SdkEventStatus::Swappable => EventStatus::Swappable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: EventStatus,
    /// Bumped on every mutation; writers pass the version they read.
    pub version: u64,
    pub created_at: OffsetDateTime,
}

impl Event {
    pub fn is_swappable(&self) -> bool {
        self.status == EventStatus::Swappable
    }
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        EventResponse {
            id: event.id,
            owner_id: event.owner_id,
            title: event.title.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            status: event.status.into(),
            version: event.version,
            created_at: event.created_at,
        }
    }
}

/// Data for inserting a new event. Id, status and version are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInsert {
    pub owner_id: i64,
    pub title: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}
