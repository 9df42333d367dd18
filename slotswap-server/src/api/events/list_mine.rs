use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::event_store::ListOwnedEvents;
use slotswap_sdk::objects::EventResponse;

use crate::api::error::ApiError;
use crate::api::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `GET /events/mine`
pub(super) async fn list_my_events(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state
        .engine
        .events()
        .process(ListOwnedEvents {
            owner_id: user.user_id,
        })
        .await?;
    Ok(Json(events.iter().map(EventResponse::from).collect()))
}
