use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::coordinator::GetSwapRequest;
use slotswap_sdk::objects::SwapRequestResponse;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiPath, AuthenticatedUser};
use crate::state::AppState;

/// `GET /swaps/{id}`: visible to the requester and the slot's owner.
pub(super) async fn get_swap(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(request_id): ApiPath<i64>,
) -> Result<Json<SwapRequestResponse>, ApiError> {
    let request = state
        .engine
        .coordinator()
        .process(GetSwapRequest {
            request_id,
            viewer_id: user.user_id,
        })
        .await?;
    Ok(Json(SwapRequestResponse::from(&request)))
}
