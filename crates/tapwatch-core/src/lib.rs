//! Core types and utilities for tapwatch.
//!
//! This crate provides the foundational types shared by the store and the
//! dashboard layer:
//!
//! - **Identifiers**: Strongly-typed string IDs for every record kind
//! - **Error types**: Common error definitions shared across crates
//!
//! # Example
//!
//! ```
//! use tapwatch_core::{LocationId, SchoolId};
//!
//! let school_id = SchoolId::new("school1").unwrap();
//! let location_id: LocationId = "loc1".parse().unwrap();
//!
//! assert_eq!(school_id.as_str(), "school1");
//! assert_eq!(location_id.to_string(), "loc1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;

pub use error::{CoreError, Result};
pub use ids::{
    ActivityId, FeedbackId, IdError, LocationId, ProjectId, RecordId, RegistrationId, SchoolId,
    TapConnectionId, MAX_ID_LEN,
};
