//! Shared wire types for the SlotSwap time-slot exchange.
//!
//! - [`objects`]: request/response bodies and WebSocket frames.
//! - [`token`]: HMAC-SHA256 session tokens used as bearer credentials.
//! - `client` (feature `client`): typed HTTP + WebSocket client.

pub mod objects;
pub mod token;

#[cfg(feature = "client")]
pub mod client;
