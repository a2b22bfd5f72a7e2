//! Consistent hashing ring implementation.

use std::collections::BTreeMap;

use eddy_types::NodeId;
use tracing::debug;

/// Consistent hashing ring for deterministic replica placement.
///
/// Each node sits at exactly one position on a u64 ring. Positions are keyed
/// by `(hash, insertion index)`, so two nodes whose names hash identically
/// are still ordered deterministically. Replica placement walks clockwise from
/// the key's position until enough distinct nodes are found.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    /// Ring positions: (hash, insertion index) -> node.
    positions: BTreeMap<(u64, usize), NodeId>,
    /// Nodes in insertion order.
    nodes: Vec<NodeId>,
}

impl Ring {
    /// Create a new empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ring holding `nodes`, in order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut ring = Self::new();
        for node_id in nodes {
            ring.add_node(node_id);
        }
        ring
    }

    /// Place a node on the ring at `hash(node name)`.
    ///
    /// Adding a node that is already present is a no-op.
    pub fn add_node(&mut self, node_id: NodeId) {
        if self.nodes.contains(&node_id) {
            return;
        }
        let pos = position_of(node_id.as_str());
        self.insert_at(pos, node_id);
    }

    /// Place a node at an explicit ring position.
    ///
    /// Nodes sharing a position are ordered by insertion.
    pub(crate) fn insert_at(&mut self, pos: u64, node_id: NodeId) {
        let index = self.nodes.len();
        self.positions.insert((pos, index), node_id.clone());
        self.nodes.push(node_id.clone());
        debug!(%node_id, pos, "added node to ring");
    }

    /// Determine which nodes replicate a key.
    ///
    /// Walks clockwise from the first position whose hash is `>=` the key's
    /// hash, wrapping around, and collects `replication_factor` distinct
    /// nodes. If fewer nodes exist, returns all of them.
    pub fn owners(&self, key: &str, replication_factor: usize) -> Vec<NodeId> {
        self.owners_at(position_of(key), replication_factor)
    }

    /// Owners for a raw ring position.
    fn owners_at(&self, pos: u64, replication_factor: usize) -> Vec<NodeId> {
        if self.positions.is_empty() {
            return Vec::new();
        }

        let max_distinct = replication_factor.min(self.nodes.len());
        let mut owners = Vec::with_capacity(max_distinct);

        let after = self.positions.range((pos, 0)..);
        let before = self.positions.range(..(pos, 0));

        for (_, node_id) in after.chain(before) {
            if owners.len() == max_distinct {
                break;
            }
            if !owners.contains(node_id) {
                owners.push(node_id.clone());
            }
        }

        owners
    }

    /// Return the number of nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return all node IDs in insertion order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Return node IDs in ring order (ascending position).
    pub fn ring_order(&self) -> Vec<NodeId> {
        self.positions.values().cloned().collect()
    }
}

/// Ring position for a key or node name: the first 8 bytes of
/// `blake3(name)` read as a little-endian u64.
pub fn position_of(name: &str) -> u64 {
    let hash = blake3::hash(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
