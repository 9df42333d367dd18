//! Wiring of the engine components around one shared store.

use crate::config::EngineConfig;
use crate::coordinator::SwapCoordinator;
use crate::dispatcher::NotificationDispatcher;
use crate::event_store::EventStore;
use crate::events::{swap_event_channel, SwapEventReceiver};
use crate::marketplace::MarketplaceIndex;
use crate::processors::Notifier;
use crate::store::MemoryStore;

/// Handle to every engine component. Cloning is cheap.
#[derive(Clone)]
pub struct SwapEngine {
    store: MemoryStore,
    events: EventStore,
    coordinator: SwapCoordinator,
    dispatcher: NotificationDispatcher,
}

impl SwapEngine {
    /// Build an empty engine.
    ///
    /// The returned receiver must be handed to [`Notifier::run`], otherwise
    /// swap events are dropped once the channel fills up.
    pub fn new(config: &EngineConfig) -> (Self, SwapEventReceiver) {
        let store = MemoryStore::new();
        let (event_tx, event_rx) = swap_event_channel(config.event_buffer);
        let engine = Self {
            events: EventStore::new(store.clone()),
            coordinator: SwapCoordinator::new(store.clone(), event_tx),
            dispatcher: NotificationDispatcher::new(config.notification_buffer),
            store,
        };
        (engine, event_rx)
    }

    /// A notifier publishing through this engine's dispatcher.
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.dispatcher.clone())
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn coordinator(&self) -> &SwapCoordinator {
        &self.coordinator
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    pub fn marketplace(&self) -> &MarketplaceIndex {
        self.store.marketplace()
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}
