//! In-memory storage implementation.
//!
//! This module provides the `MemoryStore` implementation of the `RecordStore`
//! trait. Each collection is a vector in insertion order plus an id → position
//! map, so `get_all` and foreign-key scans preserve the order records were
//! put in.

use std::any::Any;
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::types::{Collection, ForeignKey, Record};
use crate::RecordStore;

/// One collection's rows.
struct Table<R: Record> {
    rows: Vec<R>,
    positions: HashMap<R::Id, usize>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

trait AnyTable: Send + Sync {
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<R: Record> AnyTable for Table<R> {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// In-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Collection, Box<dyn AnyTable>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        let mut map = f.debug_map();
        for collection in Collection::ALL {
            if let Some(table) = tables.get(&collection) {
                map.entry(&collection.name(), &table.len());
            }
        }
        map.finish()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the table for `R`, if one exists.
    fn with_table<R: Record, T>(&self, f: impl FnOnce(&Table<R>) -> T) -> Option<T> {
        let tables = self.tables.read();
        tables
            .get(&R::COLLECTION)
            .and_then(|table| table.as_any().downcast_ref::<Table<R>>())
            .map(f)
    }
}

impl RecordStore for MemoryStore {
    fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        Ok(self
            .with_table::<R, _>(|table| table.rows.clone())
            .unwrap_or_default())
    }

    fn get_by_id<R: Record>(&self, id: &R::Id) -> Result<Option<R>> {
        Ok(self
            .with_table::<R, _>(|table| {
                table.positions.get(id).map(|&pos| table.rows[pos].clone())
            })
            .flatten())
    }

    fn get_by_foreign_key<R: Record>(&self, key: &ForeignKey) -> Result<Vec<R>> {
        Ok(self
            .with_table::<R, _>(|table| {
                table
                    .rows
                    .iter()
                    .filter(|row| row.foreign_key().as_ref() == Some(key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn put<R: Record>(&self, record: &R) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables
            .entry(R::COLLECTION)
            .or_insert_with(|| Box::new(Table::<R>::default()))
            .as_any_mut()
            .downcast_mut::<Table<R>>()
            .ok_or_else(|| {
                crate::StoreError::Database(format!(
                    "collection {} holds a different record type",
                    R::COLLECTION
                ))
            })?;

        if let Some(&pos) = table.positions.get(record.id()) {
            table.rows[pos] = record.clone();
        } else {
            table.positions.insert(record.id().clone(), table.rows.len());
            table.rows.push(record.clone());
        }
        Ok(())
    }

    fn count(&self, collection: Collection) -> Result<usize> {
        Ok(self
            .tables
            .read()
            .get(&collection)
            .map_or(0, |table| table.len()))
    }
}
