//! Event system for the notification pipeline.
//!
//! # Event Flow
//!
//! 1. `SwapCoordinator` commits a transaction and emits a `SwapEvent`
//! 2. `Notifier` turns it into a `Notification` for the recipient
//! 3. `NotificationDispatcher` pushes it to each of the recipient's channels
//!
//! Emission uses `try_send`, so a slow notifier never stalls a mutation.

pub mod channels;
pub mod types;

pub use channels::{swap_event_channel, SwapEventReceiver, SwapEventSender, DEFAULT_CHANNEL_BUFFER};
pub use types::{CancelReason, SwapEvent};
