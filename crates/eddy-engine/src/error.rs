//! Error types for the coordinator.

/// Errors that can occur during store construction or a put/get.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The store configuration is invalid (empty node list, bad replication
    /// factor, mismatched replicas). Fatal to store creation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Fewer than W replicas acknowledged a put.
    ///
    /// Replicas that did accept the write keep it; nothing is rolled back.
    #[error("write quorum not met: {acks} acks, need {required}")]
    WriteQuorumNotMet {
        /// Replicas that acknowledged the write.
        acks: usize,
        /// The configured write quorum W.
        required: usize,
    },

    /// Fewer than R replicas answered a get.
    #[error("read quorum not met: {responses} responses, need {required}")]
    ReadQuorumNotMet {
        /// Replicas that answered.
        responses: usize,
        /// The configured read quorum R.
        required: usize,
    },

    /// The writing actor's counter in the base clock is already at
    /// `u64::MAX`, so no clock can supersede it. Nothing was written.
    #[error("clock counter for actor {actor} is exhausted")]
    ClockOverflow {
        /// The actor whose counter cannot be incremented.
        actor: String,
    },
}
