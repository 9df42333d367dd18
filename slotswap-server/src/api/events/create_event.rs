use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use slotswap_core::event_store::CreateEvent;
use slotswap_sdk::objects::{CreateEventRequest, EventResponse};

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, AuthenticatedUser};
use crate::state::AppState;

/// `POST /events`: create an event owned by the caller.
pub(super) async fn create_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(body): ApiJson<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .engine
        .events()
        .process(CreateEvent {
            owner_id: user.user_id,
            title: body.title,
            start_time: body.start_time,
            end_time: body.end_time,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(&event))))
}
