//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `RecordStore`
//! trait. Values are CBOR-encoded records; keys are built by [`crate::keys`].

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};
use tapwatch_core::RecordId;

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::types::{Collection, ForeignKey, Record};
use crate::RecordStore;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serialises sequence allocation so concurrent puts never share a slot.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), "Opened RocksDB record store");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Look up the sequence number assigned to a record id.
    fn seq_of(&self, collection: Collection, id: &str) -> Result<Option<u64>> {
        let cf_ids = self.cf(cf::RECORD_IDS)?;
        self.db
            .get_cf(&cf_ids, keys::id_key(collection, id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| keys::decode_seq(collection, &data))
            .transpose()
    }

    /// Load a record by its sequence number.
    fn get_by_seq<R: Record>(&self, seq: u64) -> Result<Option<R>> {
        let cf_records = self.cf(cf::RECORDS)?;
        self.db
            .get_cf(&cf_records, keys::record_key(R::COLLECTION, seq))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Allocate the next sequence number for a collection.
    ///
    /// Callers must hold `write_lock` until the returned batch is written.
    fn next_seq(&self, collection: Collection, batch: &mut WriteBatch) -> Result<u64> {
        let cf_seq = self.cf(cf::SEQUENCES)?;
        let key = keys::sequence_key(collection);
        let current = self
            .db
            .get_cf(&cf_seq, &key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| keys::decode_seq(collection, &data))
            .transpose()?
            .unwrap_or(0);
        batch.put_cf(&cf_seq, &key, keys::encode_seq(current + 1));
        Ok(current)
    }

    /// Scan every key under `prefix` in `cf_name`, in key order.
    fn scan_prefix(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<(Box<[u8]>, Box<[u8]>)>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            // Stop if we're past the prefix
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key, value));
        }
        Ok(entries)
    }
}

impl RecordStore for RocksStore {
    fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        let prefix = keys::collection_prefix(R::COLLECTION);
        self.scan_prefix(cf::RECORDS, &prefix)?
            .into_iter()
            .map(|(_, value)| Self::deserialize(&value))
            .collect()
    }

    fn get_by_id<R: Record>(&self, id: &R::Id) -> Result<Option<R>> {
        match self.seq_of(R::COLLECTION, id.as_str())? {
            Some(seq) => self.get_by_seq(seq),
            None => Ok(None),
        }
    }

    fn get_by_foreign_key<R: Record>(&self, key: &ForeignKey) -> Result<Vec<R>> {
        let prefix = keys::foreign_key_prefix(R::COLLECTION, key);

        let mut records = Vec::new();
        for (index_key, _) in self.scan_prefix(cf::RECORDS_BY_FOREIGN_KEY, &prefix)? {
            let seq = keys::decode_seq(R::COLLECTION, &index_key)?;
            if let Some(record) = self.get_by_seq(seq)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn put<R: Record>(&self, record: &R) -> Result<()> {
        let collection = R::COLLECTION;
        let cf_records = self.cf(cf::RECORDS)?;
        let cf_ids = self.cf(cf::RECORD_IDS)?;
        let cf_by_fk = self.cf(cf::RECORDS_BY_FOREIGN_KEY)?;

        let value = Self::serialize(record)?;
        let new_fk = record.foreign_key();

        let _guard = self.write_lock.lock();
        let mut batch = WriteBatch::default();

        // Reuse the slot of an existing record so replacement keeps its order
        let seq = if let Some(seq) = self.seq_of(collection, record.id().as_str())? {
            let old_fk = self.get_by_seq::<R>(seq)?.and_then(|old| old.foreign_key());
            if old_fk != new_fk {
                if let Some(old) = old_fk {
                    batch.delete_cf(&cf_by_fk, keys::foreign_key_key(collection, &old, seq));
                }
            }
            seq
        } else {
            let seq = self.next_seq(collection, &mut batch)?;
            batch.put_cf(
                &cf_ids,
                keys::id_key(collection, record.id().as_str()),
                keys::encode_seq(seq),
            );
            seq
        };

        batch.put_cf(&cf_records, keys::record_key(collection, seq), &value);
        if let Some(fk) = &new_fk {
            batch.put_cf(&cf_by_fk, keys::foreign_key_key(collection, fk, seq), []);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::trace!(
            collection = %collection,
            id = %record.id(),
            seq,
            "Stored record"
        );
        Ok(())
    }

    fn count(&self, collection: Collection) -> Result<usize> {
        let cf = self.cf(cf::RECORDS)?;
        let prefix = keys::collection_prefix(collection);

        let mut count = 0usize;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            count += 1;
        }

        Ok(count)
    }
}
