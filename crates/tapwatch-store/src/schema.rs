//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary records of every kind, keyed by `collection || seq`.
    pub const RECORDS: &str = "records";

    /// Index: record sequence by id, keyed by `collection || id`.
    pub const RECORD_IDS: &str = "record_ids";

    /// Index: records by foreign key, keyed by
    /// `collection || target || value || 0 || seq`.
    pub const RECORDS_BY_FOREIGN_KEY: &str = "records_by_foreign_key";

    /// Next sequence number per collection, keyed by `collection`.
    pub const SEQUENCES: &str = "sequences";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::RECORDS,
        cf::RECORD_IDS,
        cf::RECORDS_BY_FOREIGN_KEY,
        cf::SEQUENCES,
    ]
}
