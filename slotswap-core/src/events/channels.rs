//! Event channel factories and handles.

use super::types::SwapEvent;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// This provides enough buffer to handle bursts while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for SwapEvent events.
pub type SwapEventSender = mpsc::Sender<SwapEvent>;
/// Receiver handle for SwapEvent events.
pub type SwapEventReceiver = mpsc::Receiver<SwapEvent>;

/// Create a new SwapEvent channel.
///
/// Every mutating component holds a clone of the sender; the `Notifier`
/// owns the receiver.
pub fn swap_event_channel(buffer: usize) -> (SwapEventSender, SwapEventReceiver) {
    mpsc::channel(buffer.max(1))
}
