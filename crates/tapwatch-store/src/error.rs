//! Error types for the record store.

use thiserror::Error;

use crate::types::Collection;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An index entry could not be decoded.
    #[error("corrupt index key in {collection}: {reason}")]
    CorruptKey {
        /// The collection whose index is damaged.
        collection: Collection,
        /// What was wrong with the key.
        reason: String,
    },
}
