//! In-memory replica backend.

use std::collections::HashMap;

use eddy_types::{NodeId, VersionedValue};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::traits::ReplicaStore;

/// In-memory replica backed by a `RwLock<HashMap>`.
///
/// Each `MemoryStore` owns its own lock, so writes to different replicas
/// never contend with each other.
pub struct MemoryStore {
    node_id: NodeId,
    versions: RwLock<HashMap<String, Vec<VersionedValue>>>,
}

impl MemoryStore {
    /// Create an empty replica for `node_id`.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            versions: RwLock::new(HashMap::new()),
        }
    }
}

/// Insert `incoming` into an antichain of versions, keeping it an antichain.
///
/// Drops every version `incoming` dominates. Returns `false` (and leaves the
/// set untouched) if `incoming` is already present or is dominated by a
/// version in the set.
pub fn insert_pruned(versions: &mut Vec<VersionedValue>, incoming: VersionedValue) -> bool {
    if versions
        .iter()
        .any(|current| *current == incoming || current.dominates(&incoming))
    {
        return false;
    }
    versions.retain(|current| !incoming.dominates(current));
    versions.push(incoming);
    true
}

#[async_trait::async_trait]
impl ReplicaStore for MemoryStore {
    fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    async fn put_version(&self, key: &str, version: VersionedValue) -> Result<(), StoreError> {
        let mut map = self.versions.write().await;
        let stored = map.entry(key.to_string()).or_default();
        let before = stored.len();
        let clock = version.clock().clone();

        if insert_pruned(stored, version) {
            debug!(
                node = %self.node_id, key, %clock,
                pruned = before + 1 - stored.len(),
                siblings = stored.len(),
                "stored version"
            );
        } else {
            debug!(node = %self.node_id, key, %clock, "version already covered, skipped");
        }
        Ok(())
    }

    async fn get_versions(&self, key: &str) -> Result<Vec<VersionedValue>, StoreError> {
        let map = self.versions.read().await;
        Ok(map.get(key).cloned().unwrap_or_default())
    }
}
