//! [`KvStore`]: the quorum coordinator.
//!
//! A `KvStore` owns the placement ring and a handle to every replica. Each
//! put or get resolves the key's replica set on the ring, fans the call out
//! to every replica concurrently, and counts how many answered before the
//! per-replica deadline. Puts return once W replicas have acknowledged;
//! gets collect every replica that answers in time.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use eddy_placement::Ring;
use eddy_store::{MemoryStore, ReplicaStore, StoreError, insert_pruned};
use eddy_types::{NodeId, VectorClock, VersionedValue};
use futures::FutureExt;
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::EngineError;

/// The distributed store façade: replicated writes and reads with W/R quorums.
///
/// The ring and quorum settings are fixed at construction and read without
/// synchronization; all mutable state lives inside the replicas.
pub struct KvStore {
    /// Placement ring over every configured node.
    ring: Ring,
    /// Replica handles, keyed by node.
    replicas: HashMap<NodeId, Arc<dyn ReplicaStore>>,
    /// Replicas touched per key (N), already clamped to the node count.
    replication_factor: usize,
    /// Acks required for a put (W).
    write_quorum: usize,
    /// Responses required for a get (R).
    read_quorum: usize,
    /// Deadline for a single replica call.
    replica_timeout: Duration,
}

impl KvStore {
    /// Build a store with one in-memory replica per configured node.
    pub fn new(config: StoreConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let replicas = config
            .node_names
            .iter()
            .map(|name| {
                Arc::new(MemoryStore::new(NodeId::from(name.as_str()))) as Arc<dyn ReplicaStore>
            })
            .collect();
        Self::with_replicas(config, replicas)
    }

    /// Build a store over caller-supplied replicas.
    ///
    /// `replicas` must line up one-to-one, in order, with
    /// `config.node_names`.
    pub fn with_replicas(
        config: StoreConfig,
        replicas: Vec<Arc<dyn ReplicaStore>>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        if replicas.len() != config.node_names.len() {
            return Err(EngineError::Config(format!(
                "{} node names but {} replicas",
                config.node_names.len(),
                replicas.len()
            )));
        }

        let mut by_id = HashMap::with_capacity(replicas.len());
        for (name, replica) in config.node_names.iter().zip(replicas) {
            if replica.node_id().as_str() != name {
                return Err(EngineError::Config(format!(
                    "replica {} registered under node name {name}",
                    replica.node_id()
                )));
            }
            by_id.insert(replica.node_id().clone(), replica);
        }

        let ring = Ring::from_nodes(config.node_names.iter().map(|n| NodeId::from(n.as_str())));

        let replication_factor = config.effective_replication();
        if replication_factor < config.replication_factor {
            warn!(
                requested = config.replication_factor,
                nodes = ring.node_count(),
                "replication factor exceeds node count, clamping"
            );
        }

        info!(
            nodes = ring.node_count(),
            n = replication_factor,
            w = config.write_quorum,
            r = config.read_quorum,
            timeout_ms = config.replica_timeout_ms,
            "kv store ready"
        );

        Ok(Self {
            ring,
            replicas: by_id,
            replication_factor,
            write_quorum: config.write_quorum,
            read_quorum: config.read_quorum,
            replica_timeout: config.replica_timeout(),
        })
    }

    /// Replicas touched per key (N), after clamping.
    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    /// Write quorum (W).
    pub fn write_quorum(&self) -> usize {
        self.write_quorum
    }

    /// Read quorum (R).
    pub fn read_quorum(&self) -> usize {
        self.read_quorum
    }

    /// The placement ring.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// The ordered replica set for `key`.
    pub fn replicas_for(&self, key: &str) -> Vec<NodeId> {
        self.ring.owners(key, self.replication_factor)
    }

    /// Handle to a single replica, bypassing the coordinator.
    pub fn replica(&self, node_id: &NodeId) -> Option<&Arc<dyn ReplicaStore>> {
        self.replicas.get(node_id)
    }

    // ------------------------------------------------------------------
    // Write path
    // ------------------------------------------------------------------

    /// Write `value` for `key` on behalf of `actor`.
    ///
    /// The new clock is `base_clock` with `actor`'s counter bumped by one;
    /// pass the clock returned by an earlier put (or merged from a get) to
    /// chain writes causally. Returns the new clock on success.
    ///
    /// Returns as soon as W replicas have acknowledged. Writes still in
    /// flight at that point keep running on a background task, each under the
    /// same per-replica deadline.
    ///
    /// Fails with [`EngineError::WriteQuorumNotMet`] if fewer than W replicas
    /// acknowledged. Replicas that did accept the write keep it. Fails with
    /// [`EngineError::ClockOverflow`], before touching any replica, if
    /// `actor`'s counter in `base_clock` is already at its maximum.
    pub async fn put(
        &self,
        key: &str,
        value: &str,
        actor: &str,
        base_clock: &VectorClock,
    ) -> Result<VectorClock, EngineError> {
        let clock = base_clock
            .checked_increment(actor)
            .ok_or_else(|| EngineError::ClockOverflow {
                actor: actor.to_string(),
            })?;
        let replicas = self.replica_set(key);
        let version = VersionedValue::new(value, clock.clone());

        debug!(key, actor, %clock, replicas = replicas.len(), "put: fanning out");

        let deadline = self.replica_timeout;
        let mut pending: FuturesUnordered<_> = replicas
            .into_iter()
            .map(|replica| {
                let key = key.to_string();
                let version = version.clone();
                async move {
                    let node = replica.node_id().clone();
                    let outcome =
                        bounded(deadline, &node, replica.put_version(&key, version)).await;
                    (node, outcome)
                }
            })
            .collect();

        let mut acks = 0;
        while acks < self.write_quorum {
            let Some((node, outcome)) = pending.next().await else {
                break;
            };
            if succeeded("put", key, &node, &outcome) {
                acks += 1;
            }
        }

        // Pick up replicas that have already answered without waiting on the rest.
        while let Some(Some((node, outcome))) = pending.next().now_or_never() {
            if succeeded("put", key, &node, &outcome) {
                acks += 1;
            }
        }

        if acks < self.write_quorum {
            warn!(key, acks, required = self.write_quorum, "put: write quorum not met");
            return Err(EngineError::WriteQuorumNotMet {
                acks,
                required: self.write_quorum,
            });
        }

        if !pending.is_empty() {
            debug!(
                key,
                in_flight = pending.len(),
                "put: quorum reached, finishing remaining replicas in background"
            );
            let key = key.to_string();
            tokio::spawn(async move {
                while let Some((node, outcome)) = pending.next().await {
                    if succeeded("put", &key, &node, &outcome) {
                        debug!(key = %key, %node, "put: late replica acknowledged");
                    }
                }
            });
        }

        debug!(key, acks, %clock, "put: complete");
        Ok(clock)
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Read every causally-maximal version of `key`.
    ///
    /// More than one result means the key has siblings: concurrent writes
    /// none of which supersedes the others. An empty result means the key
    /// was never written (on the replicas that answered).
    ///
    /// Unlike [`put`](Self::put), a get waits for every replica in the set
    /// (up to the per-replica deadline) so the result is the union of all
    /// live replicas, not just the first R.
    ///
    /// Fails with [`EngineError::ReadQuorumNotMet`] if fewer than R replicas
    /// answered.
    pub async fn get(&self, key: &str) -> Result<Vec<VersionedValue>, EngineError> {
        let replicas = self.replica_set(key);

        let outcomes = join_all(replicas.iter().map(|replica| {
            bounded(self.replica_timeout, replica.node_id(), replica.get_versions(key))
        }))
        .await;

        let responses = replicas
            .iter()
            .zip(&outcomes)
            .filter(|(replica, outcome)| succeeded("get", key, replica.node_id(), outcome))
            .count();

        if responses < self.read_quorum {
            warn!(key, responses, required = self.read_quorum, "get: read quorum not met");
            return Err(EngineError::ReadQuorumNotMet {
                responses,
                required: self.read_quorum,
            });
        }

        let mut maximal = Vec::new();
        for version in outcomes.into_iter().flatten().flatten() {
            insert_pruned(&mut maximal, version);
        }

        debug!(key, responses, versions = maximal.len(), "get: complete");
        Ok(maximal)
    }

    /// Write `value` over a set of siblings.
    ///
    /// Merges the siblings' clocks and writes with the merged clock as the
    /// base, so the new version dominates every sibling it was given.
    pub async fn resolve(
        &self,
        key: &str,
        value: &str,
        actor: &str,
        siblings: &[VersionedValue],
    ) -> Result<VectorClock, EngineError> {
        let merged = VectorClock::merge_all(siblings.iter().map(VersionedValue::clock));
        debug!(key, actor, siblings = siblings.len(), %merged, "resolving siblings");
        self.put(key, value, actor, &merged).await
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Replica handles for `key`, in ring order.
    fn replica_set(&self, key: &str) -> Vec<Arc<dyn ReplicaStore>> {
        self.replicas_for(key)
            .iter()
            .filter_map(|node_id| self.replicas.get(node_id).cloned())
            .collect()
    }
}

/// Run a replica call under the per-replica deadline.
async fn bounded<T>(
    deadline: Duration,
    node: &NodeId,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            node: node.clone(),
            after_ms: deadline.as_millis().try_into().unwrap_or(u64::MAX),
        }),
    }
}

/// `true` for a definite success. Failures and timeouts are logged.
fn succeeded<T>(op: &str, key: &str, node: &NodeId, outcome: &Result<T, StoreError>) -> bool {
    match outcome {
        Ok(_) => true,
        Err(e) => {
            warn!(op, key, %node, error = %e, "replica call failed");
            false
        }
    }
}
