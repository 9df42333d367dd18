use axum::{extract::State, http::StatusCode};
use kanau::processor::Processor;
use slotswap_core::event_store::DeleteEvent;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiPath, AuthenticatedUser};
use crate::state::AppState;

/// `DELETE /events/{id}`
pub(super) async fn delete_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .engine
        .events()
        .process(DeleteEvent {
            event_id,
            requester_id: user.user_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
