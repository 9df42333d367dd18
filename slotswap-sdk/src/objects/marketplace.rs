use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A slot currently offered for swapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceEntryResponse {
    pub event_id: i64,
    pub owner_id: i64,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub version: u64,
}
