use axum::{Json, extract::State};
use slotswap_sdk::objects::MarketplaceEntryResponse;

use super::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `GET /marketplace`: every SWAPPABLE slot not owned by the caller,
/// ordered by event id.
pub(super) async fn list_marketplace(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<Vec<MarketplaceEntryResponse>> {
    let entries = state.engine.marketplace().list_excluding(user.user_id);
    Json(entries.iter().map(MarketplaceEntryResponse::from).collect())
}
