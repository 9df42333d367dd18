//! WebSocket message types for the notification stream.
//!
//! `GET /api/v1/ws?token={session_token}` upgrades to a WebSocket
//! connection and pushes [`WsServerMessage`] JSON frames.
//!
//! # Protocol
//!
//! 1. The server sends [`WsServerMessage::Ready`] right after the upgrade.
//! 2. Each notification for the authenticated user arrives as a
//!    [`WsServerMessage::Notification`] frame, in publish order.
//! 3. Client frames other than close are ignored.
//! 4. If the session token stops verifying (the signing secret was
//!    rotated), the server sends [`WsServerMessage::Error`] and closes with
//!    [`WsCloseCode::TOKEN_REVOKED`].

use serde::{Deserialize, Serialize};

use super::notification::NotificationMessage;

/// Server-to-client WebSocket message.
///
/// Serialized as an internally-tagged JSON object:
///
/// ```json
/// {"type":"ready","user_id":7}
/// {"type":"notification","notification":{ ... }}
/// {"type":"error","code":4001,"reason":"session token no longer valid"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// The subscription is registered; notifications published from now on
    /// will be delivered.
    Ready { user_id: i64 },

    Notification { notification: NotificationMessage },

    /// A server-side error. The server may send a close frame afterwards.
    Error { code: u16, reason: String },
}

/// Well-known WebSocket close codes used by the notification stream.
///
/// Codes in the 4000–4999 range are reserved for application use by
/// [RFC 6455 §7.4.2](https://www.rfc-editor.org/rfc/rfc6455#section-7.4.2).
pub struct WsCloseCode;

impl WsCloseCode {
    pub const NORMAL: u16 = 1000;

    /// The server is shutting down.
    pub const GOING_AWAY: u16 = 1001;

    /// The session token no longer verifies against the current secret.
    pub const TOKEN_REVOKED: u16 = 4001;
}
