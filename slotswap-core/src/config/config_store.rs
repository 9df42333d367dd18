//! Versioned configuration cell with change notification.
//!
//! The server keeps reloadable sections (currently `[auth]`) in a
//! `ConfigStore`. Long-lived tasks such as WebSocket sessions hold a
//! [`ConfigWatcher`] and re-validate their state when a new version lands.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, RwLockReadGuard, watch};

/// Shared value of type `T` plus a version counter bumped on every update.
pub struct ConfigStore<T> {
    inner: Arc<ConfigStoreInner<T>>,
}

struct ConfigStoreInner<T> {
    data: RwLock<T>,
    version: AtomicU64,
    version_tx: watch::Sender<u64>,
}

/// Waits for [`ConfigStore`] updates.
pub struct ConfigWatcher {
    version_rx: watch::Receiver<u64>,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(ConfigStoreInner {
                data: RwLock::new(initial),
                version: AtomicU64::new(0),
                version_tx,
            }),
        }
    }

    /// Replace the value and wake every watcher. Returns the new version.
    pub async fn update(&self, value: T) -> u64 {
        let mut guard = self.inner.data.write().await;
        *guard = value;
        let new_version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        // Watchers re-read immediately, so release the write lock first.
        drop(guard);
        self.inner.version_tx.send_replace(new_version);
        new_version
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.data.read().await
    }

    pub fn subscribe(&self) -> ConfigWatcher {
        ConfigWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ConfigWatcher {
    /// Resolves once a version newer than the last one seen is published.
    ///
    /// Errors when the [`ConfigStore`] has been dropped.
    pub async fn changed(&mut self) -> Result<u64, watch::error::RecvError> {
        self.version_rx.changed().await?;
        Ok(*self.version_rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn watcher_sees_updates() {
        let store = ConfigStore::new(1u32);
        let mut watcher = store.subscribe();
        let writer = store.clone();
        let handle = tokio::spawn(async move { writer.update(2).await });

        assert_eq!(watcher.changed().await.unwrap(), 1);
        assert_eq!(handle.await.unwrap(), 1);
        assert_eq!(*store.read().await, 2);
    }
}
