#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod dispatcher;
pub mod engine;
pub mod entities;
pub mod error;
pub mod event_store;
pub mod events;
pub mod identity;
pub mod marketplace;
pub mod processors;
pub mod store;

pub use engine::SwapEngine;
pub use error::SwapError;
