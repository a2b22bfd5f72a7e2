//! Shared test utilities for eddy-engine tests.

use std::sync::Arc;
use std::time::Duration;

use eddy_store::{FaultyStore, MemoryStore, ReplicaStore};
use eddy_types::{NodeId, VectorClock, VersionedValue};

use crate::config::StoreConfig;
use crate::store::KvStore;

pub const NODES: [&str; 3] = ["s1", "s2", "s3"];

/// The reference setup: 3 nodes, N=3, W=2, R=2.
pub fn three_node_store() -> KvStore {
    KvStore::new(StoreConfig::new(NODES, 3, 2, 2)).unwrap()
}

/// A store whose replicas can be taken down or slowed individually.
///
/// Returns the fault handles in the same order as `names`.
pub fn faulty_store(
    names: &[&str],
    n: usize,
    w: usize,
    r: usize,
    timeout: Duration,
) -> (KvStore, Vec<Arc<FaultyStore>>) {
    let handles: Vec<Arc<FaultyStore>> = names
        .iter()
        .map(|name| {
            let inner = Arc::new(MemoryStore::new(NodeId::from(*name)));
            Arc::new(FaultyStore::new(inner))
        })
        .collect();

    let replicas = handles
        .iter()
        .map(|h| Arc::clone(h) as Arc<dyn ReplicaStore>)
        .collect();

    let config = StoreConfig::new(names.iter().copied(), n, w, r).with_replica_timeout(timeout);
    let store = KvStore::with_replicas(config, replicas).unwrap();
    (store, handles)
}

/// Same as [`faulty_store`] but wrapping each replica with fixed latency.
pub fn slow_store(
    names: &[&str],
    latencies_ms: &[u64],
    n: usize,
    w: usize,
    r: usize,
    timeout: Duration,
) -> KvStore {
    let replicas = names
        .iter()
        .zip(latencies_ms)
        .map(|(name, &ms)| {
            let inner = Arc::new(MemoryStore::new(NodeId::from(*name)));
            Arc::new(FaultyStore::new(inner).latency(ms, ms)) as Arc<dyn ReplicaStore>
        })
        .collect();

    let config = StoreConfig::new(names.iter().copied(), n, w, r).with_replica_timeout(timeout);
    KvStore::with_replicas(config, replicas).unwrap()
}

/// Sorted payloads of a version set.
pub fn values(versions: &[VersionedValue]) -> Vec<String> {
    let mut values: Vec<String> = versions.iter().map(|v| v.value().to_string()).collect();
    values.sort();
    values
}

/// Build a clock from `(actor, counter)` pairs.
pub fn vc(entries: &[(&str, u64)]) -> VectorClock {
    entries.iter().map(|&(a, c)| (a, c)).collect()
}

/// Assert no version in the set dominates another.
pub fn assert_antichain(versions: &[VersionedValue]) {
    for a in versions {
        for b in versions {
            assert!(!a.dominates(b), "{a:?} dominates {b:?}");
        }
    }
}
