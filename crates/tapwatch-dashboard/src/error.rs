//! Error types for the dashboard layer.
//!
//! The engines classify failures; turning them into user-facing messages is
//! the caller's job. An empty search or filter result is not an error.

use tapwatch_store::Collection;
use thiserror::Error;

/// A result type using `DashboardError`.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can occur while joining, aggregating or querying records.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A required foreign key does not resolve.
    #[error("{kind} record {id} referenced by {owner_kind} record {owner_id} not found")]
    ReferenceNotFound {
        /// The collection that should hold the referenced record.
        kind: Collection,
        /// The dangling identifier.
        id: String,
        /// The collection of the referencing record.
        owner_kind: Collection,
        /// The referencing record.
        owner_id: String,
    },

    /// A one-to-one relationship resolved to several records.
    #[error("{count} {kind} records reference school {owner_id}, expected at most one")]
    AmbiguousReference {
        /// The collection holding the duplicates.
        kind: Collection,
        /// The school the duplicates point at.
        owner_id: String,
        /// How many records matched.
        count: usize,
    },

    /// A record requested by id does not exist.
    #[error("{kind} record not found: {id}")]
    RecordNotFound {
        /// The collection searched.
        kind: Collection,
        /// The missing identifier.
        id: String,
    },

    /// A record violates its type's invariants.
    #[error("malformed {kind} record {id}: {reason}")]
    MalformedRecord {
        /// The record's collection.
        kind: Collection,
        /// The record's identifier.
        id: String,
        /// Which invariant failed.
        reason: String,
    },

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] tapwatch_store::StoreError),
}

impl DashboardError {
    /// Returns true if the error reflects inconsistent data rather than an
    /// infrastructure fault.
    #[must_use]
    pub const fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::ReferenceNotFound { .. }
                | Self::AmbiguousReference { .. }
                | Self::MalformedRecord { .. }
        )
    }

    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
