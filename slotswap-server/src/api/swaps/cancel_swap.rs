use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::coordinator::CancelSwap;
use slotswap_sdk::objects::SwapRequestResponse;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiPath, AuthenticatedUser};
use crate::state::AppState;

/// `POST /swaps/{id}/cancel`
pub(super) async fn cancel_swap(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(request_id): ApiPath<i64>,
) -> Result<Json<SwapRequestResponse>, ApiError> {
    let request = state
        .engine
        .coordinator()
        .process(CancelSwap {
            request_id,
            requester_id: user.user_id,
        })
        .await?;
    Ok(Json(SwapRequestResponse::from(&request)))
}
