//! A [`ReplicaStore`] wrapper that injects outages and random latency.
//!
//! `FaultyStore` wraps any `Arc<dyn ReplicaStore>`. While marked down, every
//! call fails with [`StoreError::Unavailable`]; otherwise each call may sleep
//! for a random duration first. The RNG is seeded for reproducible runs.
//!
//! # Example
//!
//! ```ignore
//! let flaky = FaultyStore::new(inner)
//!     .latency(5, 20)  // 5-20 ms per call
//!     .seed(42);
//! flaky.set_down(true);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eddy_types::{NodeId, VersionedValue};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::StoreError;
use crate::traits::ReplicaStore;

/// A [`ReplicaStore`] wrapper that can be taken down or slowed down.
pub struct FaultyStore {
    inner: Arc<dyn ReplicaStore>,
    down: AtomicBool,
    latency_ms: (u64, u64),
    rng: Mutex<StdRng>,
}

impl FaultyStore {
    /// Wrap an existing replica: up, with zero latency, by default.
    pub fn new(inner: Arc<dyn ReplicaStore>) -> Self {
        Self {
            inner,
            down: AtomicBool::new(false),
            latency_ms: (0, 0),
            rng: Mutex::new(StdRng::seed_from_u64(0)),
        }
    }

    /// Set the per-call latency range in milliseconds (uniform random).
    pub fn latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = (min_ms, max_ms);
        self
    }

    /// Set the RNG seed for deterministic behaviour.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Take the replica down (`true`) or bring it back (`false`).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
        debug!(node = %self.inner.node_id(), down, "replica availability changed");
    }

    /// `true` while the replica is down.
    pub fn is_down(&self) -> bool {
        self.down.load(Ordering::SeqCst)
    }

    /// The wrapped replica, bypassing fault injection.
    pub fn inner(&self) -> &Arc<dyn ReplicaStore> {
        &self.inner
    }

    /// Sleep for the configured latency, then fail if the replica is down.
    async fn admit(&self) -> Result<(), StoreError> {
        let (min, max) = self.latency_ms;
        let ms = if min >= max {
            min
        } else {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.random_range(min..=max)
        };

        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.is_down() {
            return Err(StoreError::Unavailable(self.inner.node_id().clone()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReplicaStore for FaultyStore {
    fn node_id(&self) -> &NodeId {
        self.inner.node_id()
    }

    async fn put_version(&self, key: &str, version: VersionedValue) -> Result<(), StoreError> {
        self.admit().await?;
        self.inner.put_version(key, version).await
    }

    async fn get_versions(&self, key: &str) -> Result<Vec<VersionedValue>, StoreError> {
        self.admit().await?;
        self.inner.get_versions(key).await
    }
}
