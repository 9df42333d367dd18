//! Swap request API handlers.
//!
//! # Endpoints
//!
//! - `POST /swaps`               – propose a swap
//! - `GET  /swaps/incoming`      – PENDING requests for the caller's slots
//! - `GET  /swaps/outgoing`      – every request the caller made
//! - `GET  /swaps/{id}`          – fetch one request
//! - `POST /swaps/{id}/respond`  – accept or reject
//! - `POST /swaps/{id}/cancel`   – withdraw one's own request

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod cancel_swap;
mod get_swap;
mod list_swaps;
mod propose_swap;
mod respond_swap;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/swaps", post(propose_swap::propose_swap))
        .route("/swaps/incoming", get(list_swaps::incoming_swaps))
        .route("/swaps/outgoing", get(list_swaps::outgoing_swaps))
        .route("/swaps/{id}", get(get_swap::get_swap))
        .route("/swaps/{id}/respond", post(respond_swap::respond_swap))
        .route("/swaps/{id}/cancel", post(cancel_swap::cancel_swap))
}
