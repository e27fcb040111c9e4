//! Error types for the cache store.

/// Errors that can occur in the store tiers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A shared-store operation failed.
    #[error("redis error: {0}")]
    Redis(#[from] fred::error::Error),

    /// A cache record could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store URL could not be parsed.
    #[error("store configuration error: {0}")]
    Config(String),
}
