use crate::events::DEFAULT_CHANNEL_BUFFER;

/// Sizing of the notification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of each connected session's channel.
    pub notification_buffer: usize,
    /// Capacity of the coordinator-to-notifier channel.
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            notification_buffer: DEFAULT_CHANNEL_BUFFER,
            event_buffer: DEFAULT_CHANNEL_BUFFER,
        }
    }
}
