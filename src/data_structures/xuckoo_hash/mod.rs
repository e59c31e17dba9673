// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Xuckoo hash table: extendible hashing combined with cuckoo hashing.
//!
//! Keys are 64-bit integers stored in two extendible hash directories, each
//! addressed by its own hash function. Every bucket holds a single key.
//!
//! # Features
//!
//! - Cuckoo displacement between the two tables resolves most collisions
//! - Bucket splitting with on-demand directory doubling when displacement cycles
//! - Bounded displacement chains: every insert terminates
//! - Configurable directory ceiling with all-or-nothing inserts
//! - Pluggable hash function pairs
//!
//! # Example
//!
//! ```
//! use xuckoo_lib::data_structures::xuckoo_hash::{IdentityHasher, TableId, XuckooHashTable};
//!
//! // h1(k) = k and h2(k) = k + 1 make placements easy to follow
//! let mut table = XuckooHashTable::with_hasher(IdentityHasher);
//!
//! // Both tables are empty, so the first key goes to table A
//! assert!(table.insert(5));
//! assert_eq!(table.table(TableId::A).key_count(), 1);
//!
//! // Table A now holds more keys, so table B is tried first
//! assert!(table.insert(9));
//! assert_eq!(table.table(TableId::B).key_count(), 1);
//!
//! assert!(table.lookup(5));
//! assert!(!table.lookup(7));
//!
//! let report = table.destroy();
//! assert_eq!(report.total(), 2);
//! ```
//!
//! # Handling the size ceiling
//!
//! [`XuckooHashTable::insert`] treats an oversized directory as fatal.
//! [`XuckooHashTable::try_insert`] reports it instead and leaves the table
//! untouched:
//!
//! ```
//! use xuckoo_lib::data_structures::xuckoo_hash::{XuckooHashConfig, XuckooHashError, XuckooHashTable, XuckooHasher};
//!
//! struct Constant;
//!
//! impl XuckooHasher for Constant {
//!     fn h1(&self, _key: u64) -> u64 { 0 }
//!     fn h2(&self, _key: u64) -> u64 { 0 }
//! }
//!
//! let config = XuckooHashConfig::new().with_max_table_size(4);
//! let mut table = XuckooHashTable::with_hasher_and_config(Constant, config);
//!
//! assert_eq!(table.try_insert(1), Ok(true));
//! assert_eq!(table.try_insert(2), Ok(true));
//! assert!(matches!(table.try_insert(3), Err(XuckooHashError::TableTooLarge { .. })));
//! assert_eq!(table.len(), 2);
//! ```

// Module declarations
mod bucket;
mod config;
mod directory;
mod error;
mod hash;
mod report;
mod stats;
mod table;

// Re-exports
pub use bucket::Bucket;
pub use self::config::{
    XuckooHashConfig, DEFAULT_MAX_TABLE_SIZE, DEFAULT_MIN_CYCLE_LOOPS, MIN_CYCLE_LOOPS_FLOOR,
};
pub use directory::DirectoryTable;
pub use error::{Result, XuckooHashError};
pub use hash::{FnvXuckooHasher, HasherKind, IdentityHasher, TableId, XuckooHasher};
pub use report::{StatsReport, TableDump};
pub use stats::{Stats, TeardownReport};
pub use table::XuckooHashTable;

#[cfg(test)]
pub(crate) use hash::MockXuckooHasher;
