//! Keyed booking locks
//!
//! One async mutex per key (`venue:<id>`, `event:<id>`, `venue-name:<name>`,
//! `user-email:<email>`).
//! Every acquisition is bounded: a caller that cannot get the lock within the
//! configured wait receives `BookingConflict` instead of queueing forever.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use super::errors::DomainError;

/// Default bounded wait for a booking lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Drop the entry for `key` once nobody holds or waits on its mutex.
/// Runs under the shard lock, so no acquirer can clone the Arc meanwhile.
fn prune(locks: &LockMap, key: &str) {
    locks.remove_if(key, |_, mutex| Arc::strong_count(mutex) == 1);
}

/// Held lock; released on drop.
#[derive(Debug)]
pub struct KeyGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl KeyGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // release first: the guard owns one reference to the mutex
        drop(self.guard.take());
        prune(&self.locks, &self.key);
    }
}

pub struct BookingLocks {
    locks: Arc<LockMap>,
    timeout: Duration,
}

impl BookingLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
            timeout,
        }
    }

    pub async fn venue(&self, venue_id: &str) -> Result<KeyGuard, DomainError> {
        self.acquire(format!("venue:{venue_id}")).await
    }

    pub async fn event(&self, event_id: &str) -> Result<KeyGuard, DomainError> {
        self.acquire(format!("event:{event_id}")).await
    }

    pub async fn venue_name(&self, name: &str) -> Result<KeyGuard, DomainError> {
        self.acquire(format!("venue-name:{}", name.trim().to_lowercase()))
            .await
    }

    pub async fn user_email(&self, email: &str) -> Result<KeyGuard, DomainError> {
        self.acquire(format!("user-email:{}", email.trim().to_lowercase()))
            .await
    }

    async fn acquire(&self, key: String) -> Result<KeyGuard, DomainError> {
        // Clone the Arc out so the map shard is not held across the await.
        let mutex = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match tokio::time::timeout(self.timeout, mutex.lock_owned()).await {
            Ok(guard) => {
                debug!(key = %key, "Booking lock acquired");
                Ok(KeyGuard {
                    key,
                    guard: Some(guard),
                    locks: self.locks.clone(),
                })
            }
            Err(_) => {
                // the holder may have released while we waited
                prune(&self.locks, &key);
                warn!(key = %key, timeout_ms = self.timeout.as_millis() as u64, "Booking lock wait timed out");
                metrics::counter!("booking_lock_timeouts_total").increment(1);
                Err(DomainError::BookingConflict(key))
            }
        }
    }
}

impl Default for BookingLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}
