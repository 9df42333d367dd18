//! Notifier processor.
//!
//! The Notifier is responsible for:
//! - Receiving `SwapEvent` from the coordinator's channel
//! - Rendering a `Notification` for the event's recipient
//! - Handing it to the `NotificationDispatcher`
//!
//! Delivery failures are logged and never reach the operation that emitted
//! the event.

use crate::dispatcher::NotificationDispatcher;
use crate::entities::Notification;
use crate::events::{CancelReason, SwapEvent, SwapEventReceiver};
use kanau::processor::Processor;
use slotswap_sdk::objects::NotificationKind;
use std::convert::Infallible;
use tokio::sync::watch;
use tracing::{debug, info};

pub struct Notifier {
    dispatcher: NotificationDispatcher,
}

impl Notifier {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run until shutdown is signaled or every sender is dropped.
    ///
    /// Events already queued when shutdown fires are still delivered.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>, mut event_rx: SwapEventReceiver) {
        info!("Notifier started");

        loop {
            tokio::select! {
                biased;

                res = shutdown_rx.changed() => {
                    if res.is_err() {
                        info!("Shutdown sender dropped, stopping Notifier");
                        break;
                    }
                    if *shutdown_rx.borrow() {
                        info!("Notifier received shutdown signal");
                        break;
                    }
                }

                Some(event) = event_rx.recv() => {
                    debug!(event = ?event, "Received SwapEvent");
                    let _ = self.process(event).await;
                }

                else => {
                    info!("SwapEvent channel closed");
                    break;
                }
            }
        }

        event_rx.close();
        while let Ok(event) = event_rx.try_recv() {
            let _ = self.process(event).await;
        }

        info!("Notifier shutdown complete");
    }
}

/// Build the user-facing notification for `event`.
pub fn notification_for(event: &SwapEvent) -> Notification {
    let (kind, message) = match event {
        SwapEvent::Proposed { .. } => (
            NotificationKind::SwapRequested,
            "You received a new swap request!",
        ),
        SwapEvent::Accepted { .. } => (
            NotificationKind::SwapAccepted,
            "Your swap request was ACCEPTED!",
        ),
        SwapEvent::Rejected { .. } => (
            NotificationKind::SwapRejected,
            "Your swap request was REJECTED.",
        ),
        SwapEvent::Cancelled {
            reason: CancelReason::SlotNoLongerAvailable,
            ..
        } => (
            NotificationKind::SwapCancelled,
            "Your swap request was cancelled: the slot is no longer available.",
        ),
        SwapEvent::Withdrawn { .. } => (
            NotificationKind::SwapWithdrawn,
            "A swap request for your slot was withdrawn.",
        ),
    };
    Notification::new(event.recipient(), kind, event.request_id(), message)
}

impl Processor<SwapEvent> for Notifier {
    type Output = usize;
    type Error = Infallible;

    async fn process(&self, event: SwapEvent) -> Result<usize, Infallible> {
        let notification = notification_for(&event);
        let user_id = notification.user_id;
        let delivered = self.dispatcher.publish(notification);
        debug!(
            user_id,
            request_id = event.request_id(),
            delivered,
            "Notification dispatched"
        );
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::swap_event_channel;

    #[test]
    fn messages_target_the_right_user() {
        let accepted = notification_for(&SwapEvent::Accepted {
            request_id: 4,
            requester_id: 9,
        });
        assert_eq!(accepted.user_id, 9);
        assert_eq!(accepted.kind, NotificationKind::SwapAccepted);
        assert_eq!(accepted.message, "Your swap request was ACCEPTED!");

        let proposed = notification_for(&SwapEvent::Proposed {
            request_id: 4,
            responder_id: 2,
        });
        assert_eq!(proposed.user_id, 2);
        assert_eq!(proposed.request_id, 4);
    }

    #[tokio::test]
    async fn run_forwards_until_shutdown() {
        let dispatcher = NotificationDispatcher::new(8);
        let mut sub = dispatcher.subscribe(3);
        let (tx, rx) = swap_event_channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(Notifier::new(dispatcher.clone()).run(shutdown_rx, rx));

        tx.send(SwapEvent::Rejected {
            request_id: 11,
            requester_id: 3,
        })
        .await
        .unwrap();
        let note = sub.recv().await.unwrap();
        assert_eq!(note.kind, NotificationKind::SwapRejected);
        assert_eq!(note.request_id, 11);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_shutdown_sender_still_delivers_queued_events() {
        let dispatcher = NotificationDispatcher::new(8);
        let mut sub = dispatcher.subscribe(5);
        let (tx, rx) = swap_event_channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tx.send(SwapEvent::Accepted {
            request_id: 21,
            requester_id: 5,
        })
        .await
        .unwrap();
        drop(shutdown_tx);

        let handle = tokio::spawn(Notifier::new(dispatcher.clone()).run(shutdown_rx, rx));
        tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("notifier must stop once the shutdown sender is gone")
            .unwrap();

        let note = sub.recv().await.unwrap();
        assert_eq!(note.kind, NotificationKind::SwapAccepted);
        assert_eq!(note.request_id, 21);
    }
}
