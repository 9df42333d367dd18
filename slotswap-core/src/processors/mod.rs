//! Event processors.
//!
//! - `Notifier`: Receives `SwapEvent`, publishes `Notification`s through the
//!   `NotificationDispatcher`

pub mod notifier;

pub use notifier::{notification_for, Notifier};
