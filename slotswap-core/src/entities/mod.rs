//! Records owned by the engine.
//!
//! Each entity has an engine-side type here and a DTO counterpart in
//! `slotswap_sdk::objects`, connected by `From` conversions.

pub mod event;
pub mod notification;
pub mod swap_request;

pub use event::{Event, EventInsert, EventStatus};
pub use notification::Notification;
pub use swap_request::{SwapRequest, SwapRequestInsert, SwapStatus};
