// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Extendible-hashing directory.
//!
//! A directory table is an array of `2^global_depth` slots, each referencing a
//! bucket. Several slots may share one bucket: a bucket of local depth `d` is
//! referenced by every slot whose low `d` bits equal the bucket's id, which is
//! `2^(global_depth - d)` slots in total.
//!
//! Buckets live in an arena owned by the table and slots hold arena handles.
//! Buckets are only ever added (one per split), so a handle stays valid for
//! the lifetime of the table.

use tracing::{debug, trace};

use super::bucket::{Bucket, BucketHandle};
use super::error::{Result, XuckooHashError};
use super::hash::TableId;

/// Returns the low `depth` bits of `value` as a slot address.
fn low_bits(depth: u32, value: u64) -> usize {
    let mask = 1u64.checked_shl(depth).map_or(u64::MAX, |bit| bit - 1);
    (value & mask) as usize
}

/// What a split changed, so that it can be reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SplitRecord {
    old: BucketHandle,
    new: BucketHandle,
    grew: bool,
}

/// One of the two extendible hash directories of a Xuckoo table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTable {
    /// Which of the two tables this is
    id: TableId,

    /// Bucket handle for every address, `2^global_depth` entries
    slots: Vec<BucketHandle>,

    /// Bucket arena, indexed by handle
    buckets: Vec<Bucket>,

    /// Number of low hash bits used for addressing
    global_depth: u32,

    /// Number of occupied buckets
    key_count: usize,

    /// Ceiling on `slots.len()`
    max_size: usize,
}

impl DirectoryTable {
    /// Creates a table with a single slot pointing at one empty bucket.
    pub(crate) fn new(id: TableId, max_size: usize) -> Self {
        Self {
            id,
            slots: vec![BucketHandle(0)],
            buckets: vec![Bucket::new(0, 0)],
            global_depth: 0,
            key_count: 0,
            max_size,
        }
    }

    /// Which table this is.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Number of slots (`2^global_depth`).
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Number of low hash bits used for addressing.
    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    /// Number of keys stored in this table.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Number of distinct buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The slot address for a hash value: its low `global_depth` bits.
    pub fn address_of(&self, hash: u64) -> usize {
        low_bits(self.global_depth, hash)
    }

    /// The bucket referenced by the slot at `address`.
    ///
    /// # Panics
    ///
    /// Panics if `address` is not below [`size`](Self::size).
    pub fn bucket_at(&self, address: usize) -> &Bucket {
        &self.buckets[self.slots[address].0]
    }

    fn bucket_at_mut(&mut self, address: usize) -> &mut Bucket {
        &mut self.buckets[self.slots[address].0]
    }

    /// Number of slots sharing the bucket referenced at `address`.
    pub fn slot_references(&self, address: usize) -> usize {
        let handle = self.slots[address];
        self.slots.iter().filter(|&&slot| slot == handle).count()
    }

    /// Buckets in slot order, one entry per slot.
    pub fn slots(&self) -> impl Iterator<Item = &Bucket> + '_ {
        self.slots.iter().map(move |handle| &self.buckets[handle.0])
    }

    /// Keys stored in this table.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().filter_map(Bucket::key)
    }

    /// Stores `key` in the bucket at `address` and returns the evicted key.
    /// The key count grows only when the bucket was empty.
    pub(crate) fn store(&mut self, address: usize, key: u64) -> Option<u64> {
        let previous = self.bucket_at_mut(address).store(key);
        if previous.is_none() {
            self.key_count += 1;
        }
        previous
    }

    /// Puts back a key evicted by [`store`](Self::store).
    pub(crate) fn restore(&mut self, address: usize, key: u64) {
        let displaced = self.bucket_at_mut(address).store(key);
        debug_assert!(displaced.is_some(), "restored into an empty bucket");
    }

    /// Doubles the directory. Slot `i + old_size` starts out as a copy of slot `i`.
    pub fn grow(&mut self) -> Result<()> {
        let requested = self.slots.len().saturating_mul(2);
        if requested > self.max_size {
            return Err(XuckooHashError::TableTooLarge {
                table: self.id,
                requested,
                limit: self.max_size,
            });
        }

        self.slots.extend_from_within(..);
        self.global_depth += 1;
        trace!(table = %self.id, size = requested, "directory doubled");
        Ok(())
    }

    /// Splits the bucket referenced at `address` in two.
    ///
    /// The directory is doubled first when the bucket is referenced by a
    /// single slot. The new bucket takes over every slot whose low bits match
    /// its id at the increased depth, and the old bucket's key is moved to
    /// wherever `hash` now addresses it. Nothing is modified when the
    /// required growth is refused.
    pub(crate) fn split<F>(&mut self, address: usize, hash: F) -> Result<SplitRecord>
    where
        F: Fn(u64) -> u64,
    {
        let old = self.slots[address];
        let grew = self.buckets[old.0].local_depth() == self.global_depth;
        if grew {
            self.grow()?;
        }

        let bucket = &mut self.buckets[old.0];
        let depth = bucket.local_depth();
        let new_depth = depth + 1;
        bucket.set_local_depth(new_depth);
        let new_id = (1usize << depth) | bucket.id();

        let new = BucketHandle(self.buckets.len());
        self.buckets.push(Bucket::new(new_id, new_depth));

        for prefix in 0..(1usize << (self.global_depth - new_depth)) {
            self.slots[(prefix << new_depth) | new_id] = new;
        }

        if let Some(key) = self.buckets[old.0].take() {
            self.reinsert(key, hash(key));
        }

        debug!(
            table = %self.id,
            bucket = new_id,
            depth = new_depth,
            grew,
            "bucket split"
        );
        Ok(SplitRecord { old, new, grew })
    }

    /// Places `key` at the address of `hash`. The target bucket must be empty,
    /// which holds right after a split.
    pub(crate) fn reinsert(&mut self, key: u64, hash: u64) {
        let address = self.address_of(hash);
        let previous = self.bucket_at_mut(address).store(key);
        debug_assert!(previous.is_none(), "reinsert overwrote key {previous:?}");
    }

    /// Reverts a split. Every change made after the split must already have
    /// been reverted.
    pub(crate) fn undo_split(&mut self, record: SplitRecord) {
        let SplitRecord { old, new, grew } = record;
        debug_assert_eq!(new.0 + 1, self.buckets.len(), "splits undone out of order");

        for slot in self.slots.iter_mut().filter(|slot| **slot == new) {
            *slot = old;
        }

        let moved = self.buckets.pop().and_then(|bucket| bucket.key());
        let bucket = &mut self.buckets[old.0];
        bucket.set_local_depth(bucket.local_depth() - 1);
        if let Some(key) = moved {
            bucket.store(key);
        }

        if grew {
            self.slots.truncate(self.slots.len() / 2);
            self.global_depth -= 1;
        }
        trace!(table = %self.id, "split reverted");
    }

    /// Releases every bucket, scanning slots from the highest address down
    /// and freeing a bucket only at the slot whose address equals its id.
    /// Returns the number of buckets released.
    pub(crate) fn teardown(self) -> usize {
        let Self { slots, buckets, .. } = self;
        let mut arena = buckets.into_iter().map(Some).collect::<Vec<_>>();

        let mut released = 0;
        for (address, handle) in slots.iter().enumerate().rev() {
            let owns = arena[handle.0]
                .as_ref()
                .is_some_and(|bucket| bucket.id() == address);
            if owns {
                drop(arena[handle.0].take());
                released += 1;
            }
        }

        debug_assert!(arena.iter().all(Option::is_none), "bucket leaked at teardown");
        released
    }

    /// Checks the directory's structural invariants.
    pub(crate) fn check_invariants<F>(&self, hash: F) -> Result<()>
    where
        F: Fn(u64) -> u64,
    {
        let violation = |message: String| {
            Err(XuckooHashError::InvariantViolation(format!(
                "table {}: {message}",
                self.id
            )))
        };

        if self.slots.len() != 1usize << self.global_depth {
            return violation(format!(
                "{} slots at global depth {}",
                self.slots.len(),
                self.global_depth
            ));
        }

        let mut references = vec![0usize; self.buckets.len()];
        for (address, handle) in self.slots.iter().enumerate() {
            let Some(bucket) = self.buckets.get(handle.0) else {
                return violation(format!("slot {address} references a missing bucket"));
            };
            if bucket.local_depth() > self.global_depth {
                return violation(format!(
                    "bucket {} is deeper than the directory",
                    bucket.id()
                ));
            }
            if low_bits(bucket.local_depth(), address as u64) != bucket.id() {
                return violation(format!(
                    "slot {address} references bucket {} at depth {}",
                    bucket.id(),
                    bucket.local_depth()
                ));
            }
            references[handle.0] += 1;
        }

        for (bucket, count) in self.buckets.iter().zip(&references) {
            let expected = 1usize << (self.global_depth - bucket.local_depth());
            if *count != expected {
                return violation(format!(
                    "bucket {} has {count} slot references, expected {expected}",
                    bucket.id()
                ));
            }
        }

        let occupied = self.buckets.iter().filter(|b| b.is_occupied()).count();
        if occupied != self.key_count {
            return violation(format!(
                "{occupied} occupied buckets but key count is {}",
                self.key_count
            ));
        }

        for (index, bucket) in self.buckets.iter().enumerate() {
            if let Some(key) = bucket.key() {
                let address = self.address_of(hash(key));
                if self.slots[address].0 != index {
                    return violation(format!(
                        "key {key} stored in bucket {} but addressed at slot {address}",
                        bucket.id()
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(key: u64) -> u64 {
        key
    }

    #[test]
    fn test_new_table() {
        let table = DirectoryTable::new(TableId::A, 16);
        assert_eq!(table.size(), 1);
        assert_eq!(table.global_depth(), 0);
        assert_eq!(table.key_count(), 0);
        assert_eq!(table.bucket_count(), 1);
        assert!(!table.bucket_at(0).is_occupied());
        assert!(table.check_invariants(identity).is_ok());
    }

    #[test]
    fn test_address_uses_low_bits() {
        let mut table = DirectoryTable::new(TableId::A, 16);
        assert_eq!(table.address_of(0xFFFF), 0);

        table.grow().unwrap();
        table.grow().unwrap();
        assert_eq!(table.address_of(0b1_0110), 0b10);
        assert_eq!(table.address_of(u64::MAX), 3);
    }

    #[test]
    fn test_grow_duplicates_slots() {
        let mut table = DirectoryTable::new(TableId::B, 16);
        table.store(0, 7);
        table.grow().unwrap();
        table.grow().unwrap();

        assert_eq!(table.size(), 4);
        assert_eq!(table.global_depth(), 2);
        assert_eq!(table.bucket_count(), 1);
        assert_eq!(table.slot_references(3), 4);
        assert!(table.slots().all(|bucket| bucket.key() == Some(7)));
        assert!(table.check_invariants(|_| 0).is_ok());
    }

    #[test]
    fn test_grow_past_limit_is_refused() {
        let mut table = DirectoryTable::new(TableId::A, 2);
        table.grow().unwrap();

        let err = table.grow().unwrap_err();
        assert_eq!(
            err,
            XuckooHashError::TableTooLarge {
                table: TableId::A,
                requested: 4,
                limit: 2,
            }
        );
        assert_eq!(table.size(), 2);
        assert_eq!(table.global_depth(), 1);
    }

    #[test]
    fn test_split_at_full_depth_grows() {
        let mut table = DirectoryTable::new(TableId::A, 16);
        table.store(0, 5);

        let record = table.split(0, identity).unwrap();
        assert!(record.grew);
        assert_eq!(table.size(), 2);
        assert_eq!(table.bucket_count(), 2);

        // 5 = 0b101 moves to the new bucket at slot 1
        assert!(!table.bucket_at(0).is_occupied());
        assert_eq!(table.bucket_at(1).key(), Some(5));
        assert_eq!(table.bucket_at(1).id(), 1);
        assert_eq!(table.bucket_at(1).local_depth(), 1);
        assert_eq!(table.key_count(), 1);
        assert!(table.check_invariants(identity).is_ok());
    }

    #[test]
    fn test_split_shared_bucket_without_growth() {
        let mut table = DirectoryTable::new(TableId::A, 16);
        table.grow().unwrap();
        table.grow().unwrap();
        table.store(2, 6);

        let record = table.split(2, identity).unwrap();
        assert!(!record.grew);
        assert_eq!(table.size(), 4);

        // slots 1 and 3 now belong to the new bucket
        assert_eq!(table.bucket_at(1).id(), 1);
        assert_eq!(table.bucket_at(3).id(), 1);
        assert_eq!(table.bucket_at(0).id(), 0);
        assert_eq!(table.bucket_at(2).id(), 0);
        assert_eq!(table.slot_references(0), 2);
        assert_eq!(table.slot_references(1), 2);

        // 6 = 0b110 stays with the old bucket
        assert_eq!(table.bucket_at(2).key(), Some(6));
        assert!(table.check_invariants(identity).is_ok());
    }

    #[test]
    fn test_refused_split_changes_nothing() {
        let mut table = DirectoryTable::new(TableId::B, 1);
        table.store(0, 3);
        let before = table.clone();

        assert!(table.split(0, identity).is_err());
        assert_eq!(table, before);
    }

    #[test]
    fn test_undo_split_restores_state() {
        let mut table = DirectoryTable::new(TableId::A, 64);
        table.store(0, 12);
        let first = table.split(0, identity).unwrap();
        let before = table.clone();

        let second = table.split(0, identity).unwrap();
        let third = table.split(table.address_of(12), identity).unwrap();
        assert!(table.check_invariants(identity).is_ok());

        table.undo_split(third);
        table.undo_split(second);
        assert_eq!(table, before);

        table.undo_split(first);
        assert_eq!(table.size(), 1);
        assert_eq!(table.bucket_count(), 1);
        assert_eq!(table.bucket_at(0).key(), Some(12));
    }

    #[test]
    fn test_teardown_releases_each_bucket_once() {
        let mut table = DirectoryTable::new(TableId::A, 64);
        table.split(0, identity).unwrap();
        table.split(1, identity).unwrap();
        table.split(0, identity).unwrap();
        table.grow().unwrap();
        assert!(table.check_invariants(identity).is_ok());

        let buckets = table.bucket_count();
        assert_eq!(buckets, 4);
        assert_eq!(table.teardown(), buckets);
    }
}
