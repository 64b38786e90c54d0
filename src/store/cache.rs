//! Read-through cache for store snapshots
//!
//! A loaded value is reused until its TTL elapses or until the owner calls
//! [`ReadThroughCache::invalidate`] after writing the underlying file.

use crate::error::AppError;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry<T> {
    loaded_at: Instant,
    value: Arc<T>,
}

pub struct ReadThroughCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Entry<T>>>,
}

impl<T> ReadThroughCache<T> {
    /// A zero `ttl` disables caching: every read goes to the loader
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Return the cached value, loading it first if it is absent or stale
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<T>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        let mut slot = self.slot.write().await;
        // Another reader may have refilled the slot while we waited for the lock
        if let Some(entry) = slot.as_ref() {
            if entry.loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&entry.value));
            }
        }

        let value = Arc::new(load().await?);
        if !self.ttl.is_zero() {
            *slot = Some(Entry {
                loaded_at: Instant::now(),
                value: Arc::clone(&value),
            });
        }
        Ok(value)
    }

    /// Drop the cached value so the next read reloads it
    pub async fn invalidate(&self) {
        self.slot.write().await.take();
    }

    async fn fresh(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.loaded_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.value))
    }
}
