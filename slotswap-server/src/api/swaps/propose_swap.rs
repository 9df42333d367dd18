use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use slotswap_core::coordinator::ProposeSwap;
use slotswap_sdk::objects::{ProposeSwapRequest, SwapRequestResponse};

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, AuthenticatedUser};
use crate::state::AppState;

/// `POST /swaps`: offer `my_slot_id` in exchange for `their_slot_id`.
pub(super) async fn propose_swap(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(body): ApiJson<ProposeSwapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .engine
        .coordinator()
        .process(ProposeSwap {
            requester_id: user.user_id,
            my_slot_id: body.my_slot_id,
            their_slot_id: body.their_slot_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(SwapRequestResponse::from(&request))))
}
