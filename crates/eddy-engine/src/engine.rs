//! [`KvEngine`]: the data-plane trait for outer adapters.
//!
//! Adapters (a CLI, an RPC server, test drivers) depend on this trait instead
//! of the concrete [`KvStore`](crate::KvStore) struct, making them
//! interchangeable.

use eddy_types::{VectorClock, VersionedValue};

use crate::error::EngineError;
use crate::store::KvStore;

/// The two externally visible store operations.
#[async_trait::async_trait]
pub trait KvEngine: Send + Sync {
    /// Write `value` for `key` as `actor`, on top of `base_clock`.
    ///
    /// Returns the new clock, to be threaded into the next causal write.
    async fn put(
        &self,
        key: &str,
        value: &str,
        actor: &str,
        base_clock: &VectorClock,
    ) -> Result<VectorClock, EngineError>;

    /// Read every causally-maximal version of `key`.
    async fn get(&self, key: &str) -> Result<Vec<VersionedValue>, EngineError>;
}

#[async_trait::async_trait]
impl KvEngine for KvStore {
    async fn put(
        &self,
        key: &str,
        value: &str,
        actor: &str,
        base_clock: &VectorClock,
    ) -> Result<VectorClock, EngineError> {
        KvStore::put(self, key, value, actor, base_clock).await
    }

    async fn get(&self, key: &str) -> Result<Vec<VersionedValue>, EngineError> {
        KvStore::get(self, key).await
    }
}
