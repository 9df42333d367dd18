//! HTTP and WebSocket API.
//!
//! Every route requires a session token, sent as
//! `Authorization: Bearer {token}` or, for the WebSocket upgrade, as the
//! `token` query parameter.
//!
//! # Endpoints
//!
//! - `/events/...`   – see [`events`]
//! - `/swaps/...`    – see [`swaps`]
//! - `GET /marketplace` – tradeable slots owned by other users
//! - `GET /ws`          – notification stream

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod error;
pub mod events;
pub mod extractors;
mod marketplace;
pub mod swaps;
mod ws;

pub use error::ApiError;

/// Build the API router (mounted under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(events::router())
        .merge(swaps::router())
        .route("/marketplace", get(marketplace::list_marketplace))
        .route("/ws", get(ws::notifications_ws))
}
