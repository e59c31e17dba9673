// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The dual-table coordinator and its cuckoo displacement protocol.
//!
//! An insert starts in whichever table holds fewer keys (ties favour table A)
//! and walks a displacement chain: each step stores the carried key at its
//! address in the active table, picks up whatever key was resident there and
//! carries it to the other table. The chain ends when a step lands on an
//! empty bucket.
//!
//! A chain that brings the original key back to its original address after
//! more than `min_cycle_loops` steps is a cycle. A chain longer than the
//! combined size of both tables is treated the same way. Either one splits the
//! bucket at the current address in the active table and restarts the insert
//! with the key still being carried.
//!
//! Every swap and split of an insert is journaled. If a split is refused
//! because a directory would outgrow its limit, the journal is replayed
//! backwards and the table is left exactly as it was before the call.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::config::XuckooHashConfig;
use super::directory::{DirectoryTable, SplitRecord};
use super::error::{Result, XuckooHashError};
use super::hash::{FnvXuckooHasher, TableId, XuckooHasher};
use super::report::{StatsReport, TableDump};
use super::stats::{Stats, TeardownReport};

/// How a single displacement chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Displacement {
    /// The carried key found an empty bucket
    Placed,
    /// A bucket was split; `homeless` still needs a place
    SplitAndRestart { homeless: u64 },
}

/// A reversible change made while inserting.
#[derive(Debug)]
enum JournalEntry {
    /// The key at `address` in `table` was evicted
    Swap {
        table: TableId,
        address: usize,
        evicted: u64,
    },
    /// A bucket in `table` was split
    Split { table: TableId, record: SplitRecord },
}

/// A hash table of 64-bit keys combining extendible hashing with cuckoo
/// hashing.
///
/// Every bucket holds at most one key. Collisions are first resolved by
/// displacing keys between the two tables; only when displacement cycles does
/// a table split a bucket, doubling its directory if needed.
///
/// # Type Parameters
///
/// * `H` - The pair of hash functions addressing the two tables.
///
/// # Examples
///
/// ```
/// use xuckoo_lib::data_structures::xuckoo_hash::XuckooHashTable;
///
/// let mut table = XuckooHashTable::new();
/// assert!(table.insert(42));
/// assert!(!table.insert(42));
/// assert!(table.lookup(42));
/// assert!(!table.lookup(7));
/// ```
#[derive(Debug)]
pub struct XuckooHashTable<H: XuckooHasher = FnvXuckooHasher> {
    table_a: DirectoryTable,
    table_b: DirectoryTable,
    hasher: H,
    config: XuckooHashConfig,
    stats: Stats,
}

impl XuckooHashTable<FnvXuckooHasher> {
    /// Creates an empty table with the default hash functions and configuration.
    pub fn new() -> Self {
        Self::with_hasher(FnvXuckooHasher)
    }

    /// Creates an empty table with the default hash functions.
    pub fn with_config(config: XuckooHashConfig) -> Self {
        Self::with_hasher_and_config(FnvXuckooHasher, config)
    }
}

impl Default for XuckooHashTable<FnvXuckooHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: XuckooHasher> XuckooHashTable<H> {
    /// Creates an empty table addressed by `hasher`.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_hasher_and_config(hasher, XuckooHashConfig::default())
    }

    /// Creates an empty table: two single-slot directories with one empty
    /// bucket each, and zeroed statistics.
    pub fn with_hasher_and_config(hasher: H, config: XuckooHashConfig) -> Self {
        Self {
            table_a: DirectoryTable::new(TableId::A, config.max_table_size),
            table_b: DirectoryTable::new(TableId::B, config.max_table_size),
            hasher,
            stats: Stats::new(config.track_time),
            config,
        }
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.stats.key_count()
    }

    /// Whether no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configuration this table was built with.
    pub fn config(&self) -> &XuckooHashConfig {
        &self.config
    }

    /// Bookkeeping counters.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// One of the two directory tables.
    pub fn table(&self, id: TableId) -> &DirectoryTable {
        match id {
            TableId::A => &self.table_a,
            TableId::B => &self.table_b,
        }
    }

    fn table_mut(&mut self, id: TableId) -> &mut DirectoryTable {
        match id {
            TableId::A => &mut self.table_a,
            TableId::B => &mut self.table_b,
        }
    }

    /// Slot counts of table A and table B.
    pub fn table_sizes(&self) -> (usize, usize) {
        (self.table_a.size(), self.table_b.size())
    }

    /// Every stored key, table A first.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.table_a.keys().chain(self.table_b.keys())
    }

    fn address(&self, id: TableId, key: u64) -> usize {
        self.table(id).address_of(id.hash(&self.hasher, key))
    }

    /// Returns whether `key` is stored.
    pub fn lookup(&self, key: u64) -> bool {
        let started = self.stats.start();
        let found = self.contains(key);
        self.stats.finish(started);
        found
    }

    fn contains(&self, key: u64) -> bool {
        [TableId::A, TableId::B].into_iter().any(|id| {
            let address = self.address(id, key);
            self.table(id).bucket_at(address).key() == Some(key)
        })
    }

    /// Inserts `key` if it is not already stored.
    ///
    /// Returns `true` if the key was newly stored and `false` if it was
    /// already present.
    ///
    /// # Panics
    ///
    /// Panics if making room would grow a directory past
    /// `max_table_size`. Use [`try_insert`](Self::try_insert) to handle that
    /// case instead.
    pub fn insert(&mut self, key: u64) -> bool {
        match self.try_insert(key) {
            Ok(inserted) => inserted,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts `key` if it is not already stored.
    ///
    /// # Errors
    ///
    /// Returns [`XuckooHashError::TableTooLarge`] if making room would grow a
    /// directory past `max_table_size`. The table is then left exactly as it
    /// was before the call.
    pub fn try_insert(&mut self, key: u64) -> Result<bool> {
        let started = self.stats.start();
        let outcome = self.insert_untimed(key);
        self.stats.finish(started);
        outcome
    }

    fn insert_untimed(&mut self, key: u64) -> Result<bool> {
        if self.contains(key) {
            return Ok(false);
        }

        let mut journal = Vec::new();
        let mut pending = key;
        loop {
            match self.displace(pending, &mut journal) {
                Ok(Displacement::Placed) => return Ok(true),
                // A homeless key was evicted from a bucket, so it cannot also
                // be stored elsewhere and the duplicate check is not repeated.
                Ok(Displacement::SplitAndRestart { homeless }) => {
                    trace!(key = homeless, "restarting insert after split");
                    pending = homeless;
                }
                Err(err) => {
                    warn!(key, error = %err, "insert refused, rolling back");
                    self.rollback(journal);
                    return Err(err);
                }
            }
        }
    }

    /// Runs one displacement chain for `key`.
    fn displace(&mut self, key: u64, journal: &mut Vec<JournalEntry>) -> Result<Displacement> {
        let start = if self.table_a.key_count() <= self.table_b.key_count() {
            TableId::A
        } else {
            TableId::B
        };
        let origin_address = self.address(start, key);
        let origin_key = key;

        let mut current = key;
        let mut step = start.starting_step();
        loop {
            step += 1;
            let active = TableId::for_step(step);
            let address = self.address(active, current);

            let cycled = address == origin_address
                && current == origin_key
                && step > self.config.min_cycle_loops;
            let exhausted = step > self.table_a.size() + self.table_b.size();
            if cycled || exhausted {
                debug!(table = %active, address, step, cycled, "displacement chain broken by split");
                self.split(active, address, journal)?;
                return Ok(Displacement::SplitAndRestart { homeless: current });
            }

            match self.table_mut(active).store(address, current) {
                Some(evicted) => {
                    journal.push(JournalEntry::Swap {
                        table: active,
                        address,
                        evicted,
                    });
                    current = evicted;
                }
                None => {
                    self.stats.record_key();
                    return Ok(Displacement::Placed);
                }
            }
        }
    }

    fn split(&mut self, id: TableId, address: usize, journal: &mut Vec<JournalEntry>) -> Result<()> {
        let hasher = &self.hasher;
        let table = match id {
            TableId::A => &mut self.table_a,
            TableId::B => &mut self.table_b,
        };
        let record = table.split(address, |key| id.hash(hasher, key))?;
        self.stats.record_split();
        journal.push(JournalEntry::Split { table: id, record });
        Ok(())
    }

    fn rollback(&mut self, journal: Vec<JournalEntry>) {
        for entry in journal.into_iter().rev() {
            match entry {
                JournalEntry::Swap {
                    table,
                    address,
                    evicted,
                } => self.table_mut(table).restore(address, evicted),
                JournalEntry::Split { table, record } => {
                    self.table_mut(table).undo_split(record);
                    self.stats.revert_split();
                }
            }
        }
    }

    /// Renders every slot of both tables.
    pub fn dump(&self) -> TableDump<'_> {
        TableDump::new(&self.table_a, &self.table_b)
    }

    /// Summarises table sizes, key and bucket counts and processing time.
    pub fn report(&self) -> StatsReport {
        StatsReport {
            table_a_size: self.table_a.size(),
            table_b_size: self.table_b.size(),
            key_count: self.stats.key_count(),
            bucket_count: self.stats.bucket_count(),
            cpu_time_secs: self.stats.elapsed().as_secs_f64(),
        }
    }

    /// Checks the structural invariants of both tables and the agreement of
    /// the counters with their contents.
    pub fn check_invariants(&self) -> Result<()> {
        for id in [TableId::A, TableId::B] {
            self.table(id)
                .check_invariants(|key| id.hash(&self.hasher, key))?;
        }

        let stored = self.table_a.key_count() + self.table_b.key_count();
        if stored != self.stats.key_count() {
            return Err(XuckooHashError::InvariantViolation(format!(
                "tables hold {stored} keys but {} were inserted",
                self.stats.key_count()
            )));
        }

        let split_buckets = self.table_a.bucket_count() + self.table_b.bucket_count() - 2;
        if split_buckets != self.stats.bucket_count() {
            return Err(XuckooHashError::InvariantViolation(format!(
                "{split_buckets} buckets created by splits but {} recorded",
                self.stats.bucket_count()
            )));
        }

        let mut seen = HashSet::with_capacity(stored);
        if let Some(duplicate) = self.keys().find(|&key| !seen.insert(key)) {
            return Err(XuckooHashError::InvariantViolation(format!(
                "key {duplicate} is stored twice"
            )));
        }

        Ok(())
    }

    /// Destroys the table, releasing every bucket exactly once.
    pub fn destroy(self) -> TeardownReport {
        let report = TeardownReport {
            table_a: self.table_a.teardown(),
            table_b: self.table_b.teardown(),
        };
        debug!(buckets = report.total(), "table destroyed");
        report
    }
}
