//! Event API handlers.
//!
//! # Endpoints
//!
//! - `POST   /events`                – create a BUSY event
//! - `GET    /events/mine`           – list the caller's events
//! - `GET    /events/{id}`           – fetch one event
//! - `POST   /events/{id}/swappable` – offer the event on the marketplace
//! - `POST   /events/{id}/busy`      – withdraw it from the marketplace
//! - `DELETE /events/{id}`           – delete an event

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod create_event;
mod delete_event;
mod get_event;
mod list_mine;
mod set_status;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event::create_event))
        .route("/events/mine", get(list_mine::list_my_events))
        .route(
            "/events/{id}",
            get(get_event::get_event).delete(delete_event::delete_event),
        )
        .route("/events/{id}/swappable", post(set_status::mark_swappable))
        .route("/events/{id}/busy", post(set_status::mark_busy))
}
