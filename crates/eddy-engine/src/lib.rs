//! Quorum coordinator tying the eddy components together.
//!
//! The [`KvStore`] owns the placement ring and the replicas, and exposes the
//! replicated put / get pipeline with W/R quorum enforcement and sibling
//! detection on read.
//!
//! Outer adapters depend on the [`KvEngine`] trait rather than the concrete
//! `KvStore` struct.

pub mod config;
pub mod engine;
pub mod error;
pub mod store;

pub use config::StoreConfig;
pub use engine::KvEngine;
pub use error::EngineError;
pub use store::KvStore;

#[cfg(test)]
mod tests;
