//! Consistent hashing ring for deterministic replica placement.
//!
//! This crate implements the ring that maps a key to the ordered list of
//! replica nodes responsible for it. Every node is placed once on the ring at
//! `blake3(node_name)`; a key's replicas are the first N distinct nodes
//! reached walking clockwise from `blake3(key)`.
//!
//! The ring is built once and never rebalanced.

mod ring;

pub use ring::{Ring, position_of};
