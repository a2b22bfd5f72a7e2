//! Shared types for eddy.
//!
//! This crate defines the vocabulary used across the workspace: replica
//! identifiers ([`NodeId`]), causal metadata ([`VectorClock`], [`ClockOrder`])
//! and the unit of replicated data ([`VersionedValue`]).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod clock;

pub use clock::{ClockOrder, VectorClock};

// ---------------------------------------------------------------------------
// ID types
// ---------------------------------------------------------------------------

/// Opaque identifier for a replica node, derived from its configured name.
///
/// Cheap to clone: the name is shared behind an `Arc`.
#[derive(Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Create an ID from a node name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The node's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Versioned data
// ---------------------------------------------------------------------------

/// A payload together with the vector clock it was written under.
///
/// Immutable once built. Two versions are equal iff both the payload and the
/// clock are equal; dominance only looks at the clock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedValue {
    value: String,
    clock: VectorClock,
}

impl VersionedValue {
    /// Pair a payload with its clock.
    pub fn new(value: impl Into<String>, clock: VectorClock) -> Self {
        Self {
            value: value.into(),
            clock,
        }
    }

    /// The stored payload.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The clock this payload was written under.
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// `true` if this version causally supersedes `other`.
    pub fn dominates(&self, other: &Self) -> bool {
        self.clock.dominates(&other.clock)
    }
}
