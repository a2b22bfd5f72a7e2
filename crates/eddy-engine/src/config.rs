//! Store configuration.
//!
//! A [`StoreConfig`] can be built in code or parsed from TOML:
//!
//! ```toml
//! node_names = ["s1", "s2", "s3"]
//! replication_factor = 3
//! write_quorum = 2
//! read_quorum = 2
//! replica_timeout_ms = 1000
//! ```

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::error::EngineError;

/// Configuration for creating a [`KvStore`](crate::KvStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Replica node names, in order. Must be non-empty and unique.
    pub node_names: Vec<String>,
    /// Replicas touched per key (N). Clamped to the node count.
    pub replication_factor: usize,
    /// Acks required for a put to succeed (W).
    pub write_quorum: usize,
    /// Responses required for a get to succeed (R).
    pub read_quorum: usize,
    /// How long to wait for a single replica before counting it as absent.
    pub replica_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            node_names: Vec::new(),
            replication_factor: 3,
            write_quorum: 2,
            read_quorum: 2,
            replica_timeout_ms: 1000,
        }
    }
}

impl StoreConfig {
    /// Config for `node_names` with the given N/W/R and the default timeout.
    pub fn new<S: Into<String>>(
        node_names: impl IntoIterator<Item = S>,
        replication_factor: usize,
        write_quorum: usize,
        read_quorum: usize,
    ) -> Self {
        Self {
            node_names: node_names.into_iter().map(Into::into).collect(),
            replication_factor,
            write_quorum,
            read_quorum,
            ..Self::default()
        }
    }

    /// Override the per-replica timeout.
    pub fn with_replica_timeout(mut self, timeout: Duration) -> Self {
        self.replica_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Parse a config from a TOML string. The result is not validated.
    pub fn from_toml(s: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(s)?)
    }

    /// Check the constraints store construction relies on.
    ///
    /// W and R are not checked against N. A quorum larger than the replica
    /// count is legal and makes every call fail.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.node_names.is_empty() {
            return Err(EngineError::Config("at least one node is required".into()));
        }
        if self.replication_factor < 1 {
            return Err(EngineError::Config(
                "replication factor must be at least 1".into(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.node_names {
            if !seen.insert(name.as_str()) {
                return Err(EngineError::Config(format!("duplicate node name: {name}")));
            }
        }
        Ok(())
    }

    /// N clamped to the number of nodes.
    pub fn effective_replication(&self) -> usize {
        self.replication_factor.min(self.node_names.len())
    }

    /// The per-replica timeout as a [`Duration`].
    pub fn replica_timeout(&self) -> Duration {
        Duration::from_millis(self.replica_timeout_ms)
    }
}
