//! Record store for the tapwatch dashboard.
//!
//! This crate holds the seven record collections the dashboard reads
//! (locations, schools, tap connections, infrastructure projects,
//! registrations, feedback and activities) behind the [`RecordStore`] trait.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`]: insertion-ordered in-memory tables, used in tests and for
//!   one-shot CLI runs over a seed file
//! - [`RocksStore`]: persistent `RocksDB` storage with column families for the
//!   id and foreign-key indexes
//!
//! # Example
//!
//! ```no_run
//! use tapwatch_store::{ForeignKey, InfrastructureProject, RecordStore, RocksStore};
//! use tapwatch_core::SchoolId;
//!
//! let store = RocksStore::open("/tmp/tapwatch-db").unwrap();
//!
//! // List projects run at one school
//! let school_id = SchoolId::new("school1").unwrap();
//! let projects: Vec<InfrastructureProject> = store
//!     .get_by_foreign_key(&ForeignKey::School(school_id))
//!     .unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;
pub mod seed;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use seed::{seed_if_empty, SeedData};
pub use types::{
    Activity, ActivityType, ApprovalStatus, Collection, Feedback, ForeignKey,
    InfrastructureProject, Location, ProjectStatus, ProjectType, Record, Registration, School,
    SchoolCategory, SchoolScoped, SchoolStatus, TapConnection, TapConnectionStatus,
    WaterSourceType,
};

/// The storage trait defining the read interface consumed by the dashboard,
/// plus the write used by external seeding.
///
/// Every read returns records in insertion order, which stays stable for the
/// lifetime of the store.
pub trait RecordStore: Send + Sync {
    /// List every record of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_all<R: Record>(&self) -> Result<Vec<R>>;

    /// Get a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_by_id<R: Record>(&self, id: &R::Id) -> Result<Option<R>>;

    /// List every record of one kind whose foreign key equals `key`.
    ///
    /// A key that the kind never carries (e.g. a location key on feedback)
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_by_foreign_key<R: Record>(&self, key: &ForeignKey) -> Result<Vec<R>>;

    /// Insert or replace a record.
    ///
    /// Replacing keeps the record's original position in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put<R: Record>(&self, record: &R) -> Result<()>;

    /// Count the records held in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count(&self, collection: Collection) -> Result<usize>;

    /// Whether a collection holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn is_empty(&self, collection: Collection) -> Result<bool> {
        Ok(self.count(collection)? == 0)
    }
}
