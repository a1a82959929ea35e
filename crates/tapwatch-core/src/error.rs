//! Common error types for tapwatch.
//!
//! This module provides shared error types that are used across multiple crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur throughout the tapwatch system.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An invalid identifier was provided.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] crate::ids::IdError),

    /// An enum label did not match any known variant.
    #[error("unknown {kind} label: {label}")]
    UnknownLabel {
        /// The enum being parsed (e.g. "tap connection status").
        kind: &'static str,
        /// The label that failed to parse.
        label: String,
    },
}
