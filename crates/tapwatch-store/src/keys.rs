//! Key encoding utilities for `RocksDB`.
//!
//! Records are keyed by `collection || sequence` so that a prefix scan over a
//! collection returns records in insertion order. Secondary indexes map
//! identifiers and foreign keys back to that sequence number.

use crate::error::{Result, StoreError};
use crate::types::{Collection, ForeignKey};

/// Separator between a variable-length value and the trailing sequence number.
/// Identifiers never contain control characters, so NUL cannot collide.
const SEPARATOR: u8 = 0;

/// Width of an encoded sequence number.
pub const SEQ_LEN: usize = 8;

/// Encode a sequence number big-endian so byte order matches numeric order.
#[must_use]
pub fn encode_seq(seq: u64) -> [u8; SEQ_LEN] {
    seq.to_be_bytes()
}

/// Decode a sequence number from the last `SEQ_LEN` bytes of a key or value.
///
/// # Errors
///
/// Returns `StoreError::CorruptKey` if fewer than `SEQ_LEN` bytes are present.
pub fn decode_seq(collection: Collection, bytes: &[u8]) -> Result<u64> {
    let start = bytes
        .len()
        .checked_sub(SEQ_LEN)
        .ok_or_else(|| StoreError::CorruptKey {
            collection,
            reason: format!("expected at least {SEQ_LEN} bytes, got {}", bytes.len()),
        })?;
    let mut buf = [0u8; SEQ_LEN];
    buf.copy_from_slice(&bytes[start..]);
    Ok(u64::from_be_bytes(buf))
}

/// Encode a primary record key: `collection || seq`.
#[must_use]
pub fn record_key(collection: Collection, seq: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + SEQ_LEN);
    key.push(collection.as_u8());
    key.extend_from_slice(&encode_seq(seq));
    key
}

/// Encode a collection prefix for scanning all records of one kind.
#[must_use]
pub fn collection_prefix(collection: Collection) -> Vec<u8> {
    vec![collection.as_u8()]
}

/// Encode an id index key: `collection || id`.
#[must_use]
pub fn id_key(collection: Collection, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + id.len());
    key.push(collection.as_u8());
    key.extend_from_slice(id.as_bytes());
    key
}

/// Encode a foreign-key prefix: `collection || target || value || 0`.
///
/// This allows prefix scans for every record of `collection` referencing the
/// given value.
#[must_use]
pub fn foreign_key_prefix(collection: Collection, fk: &ForeignKey) -> Vec<u8> {
    let value = fk.value().as_bytes();
    let mut key = Vec::with_capacity(3 + value.len() + SEQ_LEN);
    key.push(collection.as_u8());
    key.push(fk.target().as_u8());
    key.extend_from_slice(value);
    key.push(SEPARATOR);
    key
}

/// Encode a foreign-key index key: `collection || target || value || 0 || seq`.
#[must_use]
pub fn foreign_key_key(collection: Collection, fk: &ForeignKey, seq: u64) -> Vec<u8> {
    let mut key = foreign_key_prefix(collection, fk);
    key.extend_from_slice(&encode_seq(seq));
    key
}

/// Encode the sequence-counter key for a collection.
#[must_use]
pub fn sequence_key(collection: Collection) -> Vec<u8> {
    vec![collection.as_u8()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapwatch_core::SchoolId;

    fn school_fk(id: &str) -> ForeignKey {
        ForeignKey::School(SchoolId::new(id).unwrap())
    }

    #[test]
    fn record_keys_sort_by_sequence() {
        let a = record_key(Collection::Schools, 2);
        let b = record_key(Collection::Schools, 10);
        let c = record_key(Collection::Schools, 256);
        assert!(a < b);
        assert!(b < c);
        assert!(a.starts_with(&collection_prefix(Collection::Schools)));
    }

    #[test]
    fn sequence_roundtrip() {
        let key = foreign_key_key(Collection::Feedbacks, &school_fk("school3"), 42);
        assert_eq!(decode_seq(Collection::Feedbacks, &key).unwrap(), 42);
    }

    #[test]
    fn short_key_is_corrupt() {
        let result = decode_seq(Collection::Schools, &[1, 2, 3]);
        assert!(matches!(result, Err(StoreError::CorruptKey { .. })));
    }

    #[test]
    fn foreign_key_prefix_does_not_match_longer_ids() {
        // "school1" must not pick up entries for "school10".
        let prefix = foreign_key_prefix(Collection::InfrastructureProjects, &school_fk("school1"));
        let other = foreign_key_key(Collection::InfrastructureProjects, &school_fk("school10"), 1);
        let own = foreign_key_key(Collection::InfrastructureProjects, &school_fk("school1"), 1);
        assert!(!other.starts_with(&prefix));
        assert!(own.starts_with(&prefix));
    }

    #[test]
    fn collections_do_not_share_prefixes() {
        let fk = school_fk("school1");
        let projects = foreign_key_prefix(Collection::InfrastructureProjects, &fk);
        let feedback = foreign_key_prefix(Collection::Feedbacks, &fk);
        assert_ne!(projects, feedback);
        assert_ne!(
            id_key(Collection::Schools, "x"),
            id_key(Collection::Locations, "x")
        );
    }
}
