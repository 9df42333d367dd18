//! SlotSwap HTTP and WebSocket server.
//!
//! The binary in `main.rs` wires configuration, signals and the engine
//! together; everything reusable by tests lives here.

pub mod api;
pub mod config;
pub mod server;
pub mod shutdown;
pub mod state;

pub use server::build_router;
pub use state::AppState;
