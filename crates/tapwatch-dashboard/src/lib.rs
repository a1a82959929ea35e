//! Join, aggregation and query engines for the tapwatch dashboard.
//!
//! This crate turns the normalized records held by a
//! [`RecordStore`](tapwatch_store::RecordStore) into the denormalized views,
//! summary counts and filtered tables the dashboard screens show. The engines
//! are pure functions over slices; [`DashboardService`] is the async boundary
//! that snapshots the store and runs them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CLI / screens                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DashboardService                        │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │    Join     │ │ Aggregation │ │  Query (search,     │    │
//! │  │   Engine    │ │   Engine    │ │  filter, sort)      │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │    RecordStore      │
//!                   │ (RocksDB / memory)  │
//!                   └─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tapwatch_dashboard::{Dashboard, DashboardService, SchoolQuery};
//! use tapwatch_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/tapwatch")?);
//! let dashboard = DashboardService::with_defaults(store);
//!
//! let stats = dashboard.dashboard_stats().await?;
//! println!("{} of {} schools connected", stats.connected_taps, stats.total_schools);
//!
//! let query = SchoolQuery {
//!     search: "bangalore".to_string(),
//!     ..SchoolQuery::default()
//! };
//! for row in dashboard.schools(&query).await? {
//!     println!("{} ({})", row.school.name, row.location.town_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Join policies
//!
//! Detail views and the school list join strictly: a school whose location
//! is missing is an error. The connection table joins leniently by default
//! and shows a blank school instead; see [`JoinPolicy`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod join;
pub mod overview;
pub mod query;
pub mod service;
pub mod stats;
pub mod validate;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use join::{JoinPolicy, Lookup, RecordIndex};
pub use query::{
    CategoryFilter, ConnectionQuery, ConnectionSortKey, SchoolQuery, SchoolSortKey, Searchable,
    SortConfig, SortDirection, SortKey, SortValue,
};
pub use service::{Dashboard, DashboardService};
pub use stats::{DashboardStats, StatusCount};
pub use views::{
    ConnectionRow, LocationSummary, MapMarker, SchoolDetail, SchoolSummary, SchoolWithLocation,
    SchoolWithOptionalLocation, SchoolWithTapConnection,
};

// Re-export commonly used types from dependencies for convenience
pub use tapwatch_core::SchoolId;
pub use tapwatch_store::{RecordStore, TapConnectionStatus};
