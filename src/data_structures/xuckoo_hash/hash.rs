// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hash functions for the Xuckoo hash table.
//!
//! Each of the two directory tables addresses keys with its own hash function.
//! Only the low-order bits of a hash are used, so both functions must mix
//! well into the low bits and be independent enough that a collision in one
//! table rarely coincides with a collision in the other.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Seed mixed into the second hash function.
#[allow(clippy::unreadable_literal)]
const SECOND_HASH_SEED: u64 = 0x83588256c732eb1f;

/// Identifies one of the two directory tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    /// The table addressed through `h1`
    A,
    /// The table addressed through `h2`
    B,
}

impl TableId {
    /// Table used at a given step of a displacement chain: odd steps use
    /// table A, even steps use table B.
    pub(crate) fn for_step(step: usize) -> Self {
        if step % 2 == 0 {
            TableId::B
        } else {
            TableId::A
        }
    }

    /// Step counter value that makes the first step of a chain land on `self`.
    pub(crate) fn starting_step(self) -> usize {
        match self {
            TableId::A => 0,
            TableId::B => 1,
        }
    }

    /// Hashes `key` with the function belonging to this table.
    pub fn hash<H: XuckooHasher + ?Sized>(self, hasher: &H, key: u64) -> u64 {
        match self {
            TableId::A => hasher.h1(key),
            TableId::B => hasher.h2(key),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableId::A => write!(f, "A"),
            TableId::B => write!(f, "B"),
        }
    }
}

/// The pair of hash functions used to address the two tables.
#[cfg_attr(test, mockall::automock)]
pub trait XuckooHasher {
    /// Hash function for table A.
    fn h1(&self, key: u64) -> u64;

    /// Hash function for table B.
    fn h2(&self, key: u64) -> u64;
}

/// Default hasher: FNV-1a for table A and seeded SipHash for table B.
#[derive(Debug, Clone, Copy, Default)]
pub struct FnvXuckooHasher;

impl XuckooHasher for FnvXuckooHasher {
    fn h1(&self, key: u64) -> u64 {
        let mut hasher = fnv::FnvHasher::default();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn h2(&self, key: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        SECOND_HASH_SEED.hash(&mut hasher);
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// Deterministic stub: `h1(k) = k`, `h2(k) = k + 1`.
///
/// Useful for reasoning about exact placements in tests and scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher;

impl XuckooHasher for IdentityHasher {
    fn h1(&self, key: u64) -> u64 {
        key
    }

    fn h2(&self, key: u64) -> u64 {
        key.wrapping_add(1)
    }
}

/// Hash function pair selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    /// [`FnvXuckooHasher`]
    #[default]
    Fnv,
    /// [`IdentityHasher`]
    Identity,
}

impl XuckooHasher for HasherKind {
    fn h1(&self, key: u64) -> u64 {
        match self {
            HasherKind::Fnv => FnvXuckooHasher.h1(key),
            HasherKind::Identity => IdentityHasher.h1(key),
        }
    }

    fn h2(&self, key: u64) -> u64 {
        match self {
            HasherKind::Fnv => FnvXuckooHasher.h2(key),
            HasherKind::Identity => IdentityHasher.h2(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_stability() {
        let hasher = FnvXuckooHasher;
        assert_eq!(hasher.h1(42), hasher.h1(42));
        assert_eq!(hasher.h2(42), hasher.h2(42));
    }

    #[test]
    fn test_functions_differ() {
        let hasher = FnvXuckooHasher;
        let differing = (0..64u64).filter(|&k| hasher.h1(k) != hasher.h2(k)).count();
        assert_eq!(differing, 64);
    }

    #[test]
    fn test_low_bits_spread() {
        // Sequential keys should cover most of a 16-slot directory
        let hasher = FnvXuckooHasher;
        let h1_slots = (0..64u64).map(|k| hasher.h1(k) & 0xF).collect::<HashSet<_>>();
        let h2_slots = (0..64u64).map(|k| hasher.h2(k) & 0xF).collect::<HashSet<_>>();
        assert!(h1_slots.len() >= 8);
        assert!(h2_slots.len() >= 8);
    }

    #[test]
    fn test_identity_hasher() {
        assert_eq!(IdentityHasher.h1(5), 5);
        assert_eq!(IdentityHasher.h2(5), 6);
        assert_eq!(IdentityHasher.h2(u64::MAX), 0);
    }

    #[test]
    fn test_table_selection_alternates() {
        assert_eq!(TableId::for_step(1), TableId::A);
        assert_eq!(TableId::for_step(2), TableId::B);
        assert_eq!(TableId::for_step(TableId::A.starting_step() + 1), TableId::A);
        assert_eq!(TableId::for_step(TableId::B.starting_step() + 1), TableId::B);
    }

    #[test]
    fn test_hasher_kind_dispatch() {
        assert_eq!(HasherKind::Identity.h2(7), 8);
        assert_eq!(HasherKind::Fnv.h1(7), FnvXuckooHasher.h1(7));
        assert_eq!(TableId::B.hash(&HasherKind::Identity, 7), 8);
    }
}
