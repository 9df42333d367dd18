//! HTTP and WebSocket client for the SlotSwap API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod notifications;
mod swap_client;

pub use notifications::NotificationStream;
pub use swap_client::SwapClient;

use reqwest::StatusCode;

use crate::objects::ApiErrorBody;

/// Errors produced by the SDK client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status with a structured error body.
    #[error("api error: status {status}: {}", .body.message)]
    Api { status: StatusCode, body: ApiErrorBody },

    /// The server returned a non-2xx status without a parseable body.
    #[error("unexpected response: status {status}, body: {body}")]
    Unexpected { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// WebSocket handshake or framing failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
