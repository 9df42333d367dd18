use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::event_store::{SetBusy, SetSwappable};
use slotswap_sdk::objects::EventResponse;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiPath, AuthenticatedUser};
use crate::state::AppState;

/// `POST /events/{id}/swappable`: idempotent.
pub(super) async fn mark_swappable(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .engine
        .events()
        .process(SetSwappable {
            event_id,
            requester_id: user.user_id,
        })
        .await?;
    Ok(Json(EventResponse::from(&event)))
}

/// `POST /events/{id}/busy`: refused while a pending request references
/// the event.
pub(super) async fn mark_busy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .engine
        .events()
        .process(SetBusy {
            event_id,
            requester_id: user.user_id,
        })
        .await?;
    Ok(Json(EventResponse::from(&event)))
}
