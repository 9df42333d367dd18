use axum::{Json, extract::State};
use kanau::processor::Processor;
use slotswap_core::coordinator::{ListIncomingSwaps, ListOutgoingSwaps};
use slotswap_sdk::objects::SwapRequestResponse;

use crate::api::error::ApiError;
use crate::api::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `GET /swaps/incoming`
pub(super) async fn incoming_swaps(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<SwapRequestResponse>>, ApiError> {
    let requests = state
        .engine
        .coordinator()
        .process(ListIncomingSwaps {
            user_id: user.user_id,
        })
        .await?;
    Ok(Json(requests.iter().map(SwapRequestResponse::from).collect()))
}

/// `GET /swaps/outgoing`
pub(super) async fn outgoing_swaps(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<SwapRequestResponse>>, ApiError> {
    let requests = state
        .engine
        .coordinator()
        .process(ListOutgoingSwaps {
            user_id: user.user_id,
        })
        .await?;
    Ok(Json(requests.iter().map(SwapRequestResponse::from).collect()))
}
