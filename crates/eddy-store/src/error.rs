//! Error types for replica storage operations.

use eddy_types::NodeId;

/// Errors that can occur when talking to a replica.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The replica is down or unreachable.
    #[error("replica unavailable: {0}")]
    Unavailable(NodeId),

    /// The replica did not answer within the coordinator's deadline.
    #[error("replica {node} timed out after {after_ms} ms")]
    Timeout {
        /// The replica that timed out.
        node: NodeId,
        /// Deadline that elapsed, in milliseconds.
        after_ms: u64,
    },
}
