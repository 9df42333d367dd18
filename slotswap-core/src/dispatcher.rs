//! Notification dispatcher: per-user fan-out to connected channels.
//!
//! Delivery is best effort. Each connected session owns a bounded mpsc
//! channel; [`NotificationDispatcher::publish`] never waits on any of them.

use crate::entities::Notification;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};
use uuid::Uuid;

type Channels = HashMap<i64, HashMap<Uuid, mpsc::Sender<Notification>>>;

struct DispatcherInner {
    channels: RwLock<Channels>,
    buffer: usize,
}

/// Process-wide map of user id to open notification channels.
///
/// Starts empty and is never persisted. Cloning shares the same map.
#[derive(Clone)]
pub struct NotificationDispatcher {
    inner: Arc<DispatcherInner>,
}

impl NotificationDispatcher {
    /// `buffer` is the capacity of each per-session channel.
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                channels: RwLock::new(HashMap::new()),
                buffer: buffer.max(1),
            }),
        }
    }

    /// Register a new channel for `user_id`.
    ///
    /// The returned [`Subscription`] deregisters itself when dropped.
    pub fn subscribe(&self, user_id: i64) -> Subscription {
        let channel_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.inner.buffer);
        self.inner
            .channels
            .write()
            .entry(user_id)
            .or_default()
            .insert(channel_id, tx);
        debug!(user_id, %channel_id, "Notification channel registered");
        Subscription {
            user_id,
            channel_id,
            stream: ReceiverStream::new(rx),
            dispatcher: self.clone(),
        }
    }

    /// Remove one channel. Unknown ids are ignored.
    pub fn disconnect(&self, user_id: i64, channel_id: Uuid) {
        let mut channels = self.inner.channels.write();
        if let Some(user_channels) = channels.get_mut(&user_id) {
            if user_channels.remove(&channel_id).is_some() {
                debug!(user_id, %channel_id, "Notification channel deregistered");
            }
            if user_channels.is_empty() {
                channels.remove(&user_id);
            }
        }
    }

    /// Push `notification` to every channel of its user.
    ///
    /// Returns how many channels accepted it. A full channel loses this
    /// message only; a closed channel is deregistered.
    pub fn publish(&self, notification: Notification) -> usize {
        let user_id = notification.user_id;
        let mut delivered = 0;
        let mut closed = Vec::new();
        {
            let channels = self.inner.channels.read();
            let Some(user_channels) = channels.get(&user_id) else {
                debug!(user_id, request_id = notification.request_id, "No open channel, dropping notification");
                return 0;
            };
            for (channel_id, tx) in user_channels {
                match tx.try_send(notification.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        warn!(
                            user_id,
                            %channel_id,
                            request_id = notification.request_id,
                            "Notification channel full, message dropped"
                        );
                    }
                    Err(TrySendError::Closed(_)) => closed.push(*channel_id),
                }
            }
        }
        for channel_id in closed {
            self.disconnect(user_id, channel_id);
        }
        delivered
    }

    pub fn connection_count(&self, user_id: i64) -> usize {
        self.inner
            .channels
            .read()
            .get(&user_id)
            .map_or(0, HashMap::len)
    }

    pub fn connected_users(&self) -> Vec<i64> {
        let mut users: Vec<i64> = self.inner.channels.read().keys().copied().collect();
        users.sort_unstable();
        users
    }
}

/// One open notification channel.
///
/// Yields notifications in publish order.
pub struct Subscription {
    user_id: i64,
    channel_id: Uuid,
    stream: ReceiverStream<Notification>,
    dispatcher: NotificationDispatcher,
}

impl Subscription {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn channel_id(&self) -> Uuid {
        self.channel_id
    }

    /// Wait for the next notification. `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.stream.next().await
    }
}

impl Stream for Subscription {
    type Item = Notification;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Notification>> {
        Pin::new(&mut self.get_mut().stream).poll_next(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispatcher.disconnect(self.user_id, self.channel_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotswap_sdk::objects::NotificationKind;

    fn note(user_id: i64, request_id: i64) -> Notification {
        Notification::new(user_id, NotificationKind::SwapRequested, request_id, "hi")
    }

    #[tokio::test]
    async fn publish_without_channels_drops() {
        let dispatcher = NotificationDispatcher::new(4);
        assert_eq!(dispatcher.publish(note(1, 1)), 0);
    }

    #[tokio::test]
    async fn delivers_in_order_to_every_session() {
        let dispatcher = NotificationDispatcher::new(8);
        let mut first = dispatcher.subscribe(1);
        let mut second = dispatcher.subscribe(1);
        let _other = dispatcher.subscribe(2);

        for request_id in 1..=3 {
            assert_eq!(dispatcher.publish(note(1, request_id)), 2);
        }
        for sub in [&mut first, &mut second] {
            let mut seen = Vec::new();
            for _ in 0..3 {
                seen.push(sub.recv().await.unwrap().request_id);
            }
            assert_eq!(seen, vec![1, 2, 3]);
        }
    }

    #[tokio::test]
    async fn full_channel_drops_only_the_overflow() {
        let dispatcher = NotificationDispatcher::new(1);
        let mut sub = dispatcher.subscribe(1);
        assert_eq!(dispatcher.publish(note(1, 1)), 1);
        assert_eq!(dispatcher.publish(note(1, 2)), 0);
        assert_eq!(sub.recv().await.unwrap().request_id, 1);
        assert_eq!(dispatcher.connection_count(1), 1);
    }

    #[tokio::test]
    async fn dropping_subscription_deregisters() {
        let dispatcher = NotificationDispatcher::new(4);
        let sub = dispatcher.subscribe(7);
        let channel_id = sub.channel_id();
        assert_eq!(dispatcher.connected_users(), vec![7]);
        drop(sub);
        assert_eq!(dispatcher.connection_count(7), 0);
        // Idempotent.
        dispatcher.disconnect(7, channel_id);
        assert!(dispatcher.connected_users().is_empty());
    }
}
