use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::event_store::GetEvent;
use slotswap_sdk::objects::EventResponse;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiPath, AuthenticatedUser};
use crate::state::AppState;

/// `GET /events/{id}`
pub(super) async fn get_event(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state.engine.events().process(GetEvent { event_id }).await?;
    Ok(Json(EventResponse::from(&event)))
}
