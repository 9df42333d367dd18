use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::coordinator::RespondToSwap;
use slotswap_sdk::objects::{RespondSwapRequest, SwapRequestResponse};

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, ApiPath, AuthenticatedUser};
use crate::state::AppState;

/// `POST /swaps/{id}/respond`: `{"accept": true}` exchanges the slots.
pub(super) async fn respond_swap(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(request_id): ApiPath<i64>,
    ApiJson(body): ApiJson<RespondSwapRequest>,
) -> Result<Json<SwapRequestResponse>, ApiError> {
    let request = state
        .engine
        .coordinator()
        .process(RespondToSwap {
            request_id,
            responder_id: user.user_id,
            accept: body.accept,
        })
        .await?;
    Ok(Json(SwapRequestResponse::from(&request)))
}
