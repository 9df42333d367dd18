//! Application state shared across all request handlers.

use slotswap_core::SwapEngine;
use slotswap_core::config::{AuthConfig, ConfigStore};
use tokio::sync::watch;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub engine: SwapEngine,
    /// Token secret and lifetime (can be reloaded via SIGHUP).
    pub auth: ConfigStore<AuthConfig>,
    /// Flips to `true` when the server starts shutting down.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(
        engine: SwapEngine,
        auth: ConfigStore<AuthConfig>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            auth,
            shutdown,
        }
    }
}
