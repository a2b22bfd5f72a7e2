//! Core trait for per-replica version storage.

use eddy_types::{NodeId, VersionedValue};

use crate::error::StoreError;

/// A single replica's local key space.
///
/// For every key a replica holds an antichain of versions: no stored version
/// dominates another. Implementations must be `Send + Sync` so the
/// coordinator can drive many replicas concurrently from async tasks.
#[async_trait::async_trait]
pub trait ReplicaStore: Send + Sync {
    /// The node this replica belongs to.
    fn node_id(&self) -> &NodeId;

    /// Insert a version for `key`.
    ///
    /// Every stored version the new one dominates is dropped. The new version
    /// is not stored if an equal version is already present, or if a stored
    /// version dominates it.
    async fn put_version(&self, key: &str, version: VersionedValue) -> Result<(), StoreError>;

    /// Return the current versions for `key`, or an empty list if the key is
    /// unknown. Order is not meaningful.
    async fn get_versions(&self, key: &str) -> Result<Vec<VersionedValue>, StoreError>;
}
