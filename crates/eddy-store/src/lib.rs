//! Per-replica version storage for eddy.
//!
//! This crate defines the [`ReplicaStore`] trait that the coordinator talks
//! to, along with two implementations:
//!
//! - [`MemoryStore`]: an in-memory replica backed by a `RwLock<HashMap>`.
//! - [`FaultyStore`]: a wrapper that can take a replica down or slow it
//!   down, for exercising quorum and timeout handling.

mod error;
mod faulty_store;
mod memory_store;
mod traits;

pub use error::StoreError;
pub use faulty_store::FaultyStore;
pub use memory_store::{MemoryStore, insert_pruned};
pub use traits::ReplicaStore;
