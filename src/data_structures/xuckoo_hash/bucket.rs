// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Single-key buckets referenced by directory slots.

/// Index of a bucket inside its directory table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BucketHandle(pub(crate) usize);

/// A bucket stores at most one key.
///
/// `id` is the smallest slot address in the owning table that references the
/// bucket. `local_depth` is the number of low hash bits shared by every slot
/// pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    id: usize,
    local_depth: u32,
    key: Option<u64>,
}

impl Bucket {
    /// Creates an empty bucket.
    pub(crate) fn new(id: usize, local_depth: u32) -> Self {
        Self {
            id,
            local_depth,
            key: None,
        }
    }

    /// The smallest slot address referencing this bucket.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of low-order hash bits this bucket distinguishes.
    pub fn local_depth(&self) -> u32 {
        self.local_depth
    }

    /// Whether a key is stored.
    pub fn is_occupied(&self) -> bool {
        self.key.is_some()
    }

    /// The stored key, if any.
    pub fn key(&self) -> Option<u64> {
        self.key
    }

    pub(crate) fn set_local_depth(&mut self, depth: u32) {
        self.local_depth = depth;
    }

    /// Stores `key`, returning whichever key was resident before.
    pub(crate) fn store(&mut self, key: u64) -> Option<u64> {
        self.key.replace(key)
    }

    /// Empties the bucket.
    pub(crate) fn take(&mut self) -> Option<u64> {
        self.key.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bucket_is_empty() {
        let bucket = Bucket::new(3, 2);
        assert_eq!(bucket.id(), 3);
        assert_eq!(bucket.local_depth(), 2);
        assert!(!bucket.is_occupied());
        assert_eq!(bucket.key(), None);
    }

    #[test]
    fn test_store_returns_resident_key() {
        let mut bucket = Bucket::new(0, 0);
        assert_eq!(bucket.store(5), None);
        assert_eq!(bucket.store(9), Some(5));
        assert_eq!(bucket.key(), Some(9));

        assert_eq!(bucket.take(), Some(9));
        assert!(!bucket.is_occupied());
    }
}
