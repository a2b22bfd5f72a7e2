//! Single-writer put/get, construction and placement tests.

use eddy_store::ReplicaStore;
use eddy_types::{NodeId, VectorClock};

use super::helpers::{NODES, three_node_store, values, vc};
use crate::config::StoreConfig;
use crate::engine::KvEngine;
use crate::error::EngineError;
use crate::store::KvStore;

#[tokio::test]
async fn test_single_writer_converges() {
    let store = three_node_store();
    let clock = store
        .put("user:1", "alice", "s1", &VectorClock::new())
        .await
        .unwrap();
    assert_eq!(clock, vc(&[("s1", 1)]));

    let versions = store.get("user:1").await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].value(), "alice");
    assert_eq!(versions[0].clock(), &clock);
}

#[tokio::test]
async fn test_unknown_key_reads_empty() {
    let store = three_node_store();
    assert!(store.get("never-written").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_write_reaches_every_replica() {
    let store = three_node_store();
    store
        .put("user:1", "alice", "s1", &VectorClock::new())
        .await
        .unwrap();

    let replicas = store.replicas_for("user:1");
    assert_eq!(replicas.len(), 3);
    for node_id in &replicas {
        let versions = store
            .replica(node_id)
            .unwrap()
            .get_versions("user:1")
            .await
            .unwrap();
        assert_eq!(values(&versions), vec!["alice"], "missing on {node_id}");
    }
}

#[tokio::test]
async fn test_causal_chain_collapses_to_latest() {
    let store = three_node_store();
    let mut clock = VectorClock::new();
    for (i, actor) in ["s1", "s2", "s3", "s1"].iter().enumerate() {
        clock = store
            .put("counter", &format!("v{i}"), actor, &clock)
            .await
            .unwrap();
    }

    assert_eq!(clock, vc(&[("s1", 2), ("s2", 1), ("s3", 1)]));
    let versions = store.get("counter").await.unwrap();
    assert_eq!(values(&versions), vec!["v3"]);
}

#[tokio::test]
async fn test_omitting_base_clock_restarts_causality() {
    // Each put starts from the supplied base, not from the actor's history.
    let store = three_node_store();
    let first = store.put("k", "a", "s1", &VectorClock::new()).await.unwrap();
    let second = store.put("k", "b", "s1", &VectorClock::new()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(values(&store.get("k").await.unwrap()), vec!["a", "b"]);
}

#[tokio::test]
async fn test_rewriting_same_version_is_idempotent() {
    let store = three_node_store();
    store.put("k", "a", "s1", &VectorClock::new()).await.unwrap();
    store.put("k", "a", "s1", &VectorClock::new()).await.unwrap();

    assert_eq!(store.get("k").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_keys_are_independent() {
    let store = three_node_store();
    store.put("a", "1", "s1", &VectorClock::new()).await.unwrap();
    store.put("b", "2", "s2", &VectorClock::new()).await.unwrap();

    assert_eq!(values(&store.get("a").await.unwrap()), vec!["1"]);
    assert_eq!(values(&store.get("b").await.unwrap()), vec!["2"]);
}

#[tokio::test]
async fn test_exhausted_counter_is_rejected() {
    let store = three_node_store();
    let base = vc(&[("s1", u64::MAX)]);

    let err = store.put("k", "v", "s1", &base).await.unwrap_err();
    assert!(
        matches!(err, EngineError::ClockOverflow { ref actor } if actor == "s1"),
        "unexpected error: {err}"
    );
    assert!(store.get("k").await.unwrap().is_empty());

    // Another actor can still extend the same history.
    let clock = store.put("k", "v", "s2", &base).await.unwrap();
    assert_eq!(clock, vc(&[("s1", u64::MAX), ("s2", 1)]));
}

#[tokio::test]
async fn test_usable_through_engine_trait() {
    let engine: Box<dyn KvEngine> = Box::new(three_node_store());
    let clock = engine
        .put("user:1", "alice", "s1", &VectorClock::new())
        .await
        .unwrap();
    engine.put("user:1", "bob", "s2", &clock).await.unwrap();

    assert_eq!(values(&engine.get("user:1").await.unwrap()), vec!["bob"]);
}

#[test]
fn test_empty_node_list_is_config_error() {
    let result = KvStore::new(StoreConfig::new(Vec::<String>::new(), 3, 2, 2));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_zero_replication_is_config_error() {
    let result = KvStore::new(StoreConfig::new(NODES, 0, 1, 1));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_replication_factor_clamped_to_node_count() {
    let store = KvStore::new(StoreConfig::new(["s1", "s2"], 5, 1, 1)).unwrap();
    assert_eq!(store.replication_factor(), 2);
    assert_eq!(store.replicas_for("user:1").len(), 2);
}

#[test]
fn test_replicas_for_is_deterministic() {
    let names = ["a", "b", "c", "d", "e"];
    let store = KvStore::new(StoreConfig::new(names, 3, 2, 2)).unwrap();
    let twin = KvStore::new(StoreConfig::new(names, 3, 2, 2)).unwrap();

    for i in 0..50 {
        let key = format!("key-{i}");
        let replicas = store.replicas_for(&key);
        assert_eq!(replicas.len(), 3);
        assert_eq!(replicas, store.replicas_for(&key));
        assert_eq!(replicas, twin.replicas_for(&key));
    }
}

#[test]
fn test_replica_lookup() {
    let store = three_node_store();
    assert!(store.replica(&NodeId::from("s2")).is_some());
    assert!(store.replica(&NodeId::from("s9")).is_none());
    assert_eq!(store.ring().node_count(), 3);
    assert_eq!(store.write_quorum(), 2);
    assert_eq!(store.read_quorum(), 2);
}
