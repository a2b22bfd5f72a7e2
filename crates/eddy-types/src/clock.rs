//! Vector clocks and the causal dominance relation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of comparing two vector clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOrder {
    /// Both clocks carry the same counter for every actor.
    Equal,
    /// The left clock causally supersedes the right one.
    Dominates,
    /// The right clock causally supersedes the left one.
    DominatedBy,
    /// Neither clock supersedes the other: the writes were concurrent.
    Concurrent,
}

/// A vector clock: actor identifier -> monotonic counter.
///
/// Absent actors read as `0`. Zero counters are never stored, so two clocks
/// describing the same causal history are always structurally equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u64>", into = "BTreeMap<String, u64>")]
pub struct VectorClock {
    entries: BTreeMap<String, u64>,
}

impl VectorClock {
    /// Create an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter for `actor`, or `0` if the actor never wrote.
    pub fn get(&self, actor: &str) -> u64 {
        self.entries.get(actor).copied().unwrap_or(0)
    }

    /// Return a copy of this clock with `actor`'s counter bumped by one.
    ///
    /// A counter already at `u64::MAX` stays there, so the result is then
    /// equal to `self`. Use [`checked_increment`](Self::checked_increment)
    /// where that must be detected.
    pub fn increment(&self, actor: &str) -> Self {
        let mut next = self.clone();
        let slot = next.entries.entry(actor.to_string()).or_insert(0);
        *slot = slot.saturating_add(1);
        next
    }

    /// Like [`increment`](Self::increment), but `None` if `actor`'s counter
    /// is already at `u64::MAX`.
    pub fn checked_increment(&self, actor: &str) -> Option<Self> {
        let counter = self.get(actor).checked_add(1)?;
        let mut next = self.clone();
        next.entries.insert(actor.to_string(), counter);
        Some(next)
    }

    /// Pointwise maximum over the union of both clocks' actors.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.entries.clone();
        for (actor, &counter) in &other.entries {
            let slot = merged.entry(actor.clone()).or_insert(0);
            *slot = (*slot).max(counter);
        }
        Self { entries: merged }
    }

    /// Merge any number of clocks. The empty iterator yields the empty clock.
    pub fn merge_all<'a>(clocks: impl IntoIterator<Item = &'a VectorClock>) -> Self {
        clocks
            .into_iter()
            .fold(Self::new(), |acc, clock| acc.merge(clock))
    }

    /// Compare two clocks over the union of their actors.
    pub fn compare(&self, other: &Self) -> ClockOrder {
        let mut self_ahead = false;
        let mut other_ahead = false;

        for actor in self.entries.keys().chain(other.entries.keys()) {
            let mine = self.get(actor);
            let theirs = other.get(actor);
            if mine > theirs {
                self_ahead = true;
            } else if theirs > mine {
                other_ahead = true;
            }
            if self_ahead && other_ahead {
                return ClockOrder::Concurrent;
            }
        }

        match (self_ahead, other_ahead) {
            (false, false) => ClockOrder::Equal,
            (true, false) => ClockOrder::Dominates,
            (false, true) => ClockOrder::DominatedBy,
            (true, true) => ClockOrder::Concurrent,
        }
    }

    /// `self >= other` on every actor and `>` on at least one.
    ///
    /// Irreflexive: a clock never dominates an equal clock.
    pub fn dominates(&self, other: &Self) -> bool {
        self.compare(other) == ClockOrder::Dominates
    }

    /// Neither clock dominates the other and they are not equal.
    pub fn is_concurrent(&self, other: &Self) -> bool {
        self.compare(other) == ClockOrder::Concurrent
    }

    /// Actors with a non-zero counter, in sorted order.
    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `true` if no actor has written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, u64>> for VectorClock {
    fn from(mut entries: BTreeMap<String, u64>) -> Self {
        entries.retain(|_, counter| *counter > 0);
        Self { entries }
    }
}

impl From<VectorClock> for BTreeMap<String, u64> {
    fn from(clock: VectorClock) -> Self {
        clock.entries
    }
}

impl<A: Into<String>> FromIterator<(A, u64)> for VectorClock {
    fn from_iter<I: IntoIterator<Item = (A, u64)>>(iter: I) -> Self {
        let entries: BTreeMap<String, u64> =
            iter.into_iter().map(|(a, c)| (a.into(), c)).collect();
        Self::from(entries)
    }
}

impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (actor, counter)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{actor}:{counter}")?;
        }
        f.write_str("}")
    }
}
