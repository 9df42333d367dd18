//! Configuration types for SlotSwap.
//!
//! These types represent the validated runtime configuration used by the server
//! and can be shared across crates. The actual config loading/parsing is handled
//! by the server crate.

mod auth;
mod config_store;
mod engine;

pub use auth::{AuthConfig, DEFAULT_TOKEN_TTL};
pub use config_store::{ConfigStore, ConfigWatcher};
pub use engine::EngineConfig;
