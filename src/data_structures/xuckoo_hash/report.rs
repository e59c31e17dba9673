// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Human-readable views of a Xuckoo table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::directory::DirectoryTable;

/// Slot-by-slot rendering of both directory tables.
///
/// Each line shows a slot address and the id of the bucket it references.
/// At the slot whose address equals the bucket id, the bucket itself is shown
/// with its key in brackets, or `[ ]` when empty.
#[derive(Debug, Clone, Copy)]
pub struct TableDump<'a> {
    tables: [&'a DirectoryTable; 2],
}

impl<'a> TableDump<'a> {
    pub(crate) fn new(table_a: &'a DirectoryTable, table_b: &'a DirectoryTable) -> Self {
        Self {
            tables: [table_a, table_b],
        }
    }
}

impl fmt::Display for TableDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table ---")?;
        for table in self.tables {
            writeln!(f, "table {}", table.id())?;
            writeln!(f, "  address | bucket     bucket [key]")?;
            for (address, bucket) in table.slots().enumerate() {
                write!(f, "{address:>9} | {:<9}", bucket.id())?;
                if bucket.id() == address {
                    write!(f, "  {:>6} ", bucket.id())?;
                    match bucket.key() {
                        Some(key) => write!(f, "[{key}]")?,
                        None => write!(f, "[ ]")?,
                    }
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "--- end table ---")
    }
}

/// Summary counters for a Xuckoo table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Slots in table A
    pub table_a_size: usize,
    /// Slots in table B
    pub table_b_size: usize,
    /// Keys stored
    pub key_count: usize,
    /// Buckets created by splits
    pub bucket_count: usize,
    /// Time spent in public operations, in seconds
    pub cpu_time_secs: f64,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table stats ---")?;
        writeln!(f, "  table A size: {}", self.table_a_size)?;
        writeln!(f, "  table B size: {}", self.table_b_size)?;
        writeln!(f, "    keys stored: {}", self.key_count)?;
        writeln!(f, " buckets split: {}", self.bucket_count)?;
        writeln!(f, "     time spent: {:.6} sec", self.cpu_time_secs)?;
        writeln!(f, "--- end stats ---")
    }
}

#[cfg(test)]
mod tests {
    use crate::data_structures::xuckoo_hash::{IdentityHasher, XuckooHashTable};

    #[test]
    fn test_dump_shows_buckets_at_their_id() {
        let mut table = XuckooHashTable::with_hasher(IdentityHasher);
        for key in [5, 9, 7] {
            table.insert(key);
        }

        let dump = table.dump().to_string();
        let lines = dump.lines().collect::<Vec<_>>();

        assert_eq!(lines.first(), Some(&"--- table ---"));
        assert_eq!(lines.last(), Some(&"--- end table ---"));
        assert!(lines.contains(&"table A"));
        assert!(lines.contains(&"table B"));

        // 4 slots in A, 2 in B, plus two headers per table and the frame
        assert_eq!(lines.len(), 4 + 2 + 4 + 2);
        assert!(dump.contains("[5]"));
        assert!(dump.contains("[7]"));
        assert!(dump.contains("[9]"));
        assert!(dump.contains("[ ]"));
    }

    #[test]
    fn test_shared_slots_omit_bucket_column() {
        let mut table = XuckooHashTable::with_hasher(IdentityHasher);
        for key in [5, 9, 7] {
            table.insert(key);
        }
        let dump = table.dump().to_string();

        // Slot 2 of table A shares bucket 0 and shows no bucket column
        let slot_two = dump
            .lines()
            .find(|line| line.trim_start().starts_with("2 |"))
            .unwrap();
        assert!(!slot_two.contains('['));
    }

    #[test]
    fn test_report_display_and_json() {
        let mut table = XuckooHashTable::with_hasher(IdentityHasher);
        table.insert(5);
        table.insert(9);

        let report = table.report();
        assert_eq!(report.table_a_size, 1);
        assert_eq!(report.table_b_size, 1);
        assert_eq!(report.key_count, 2);
        assert_eq!(report.bucket_count, 0);

        let text = report.to_string();
        assert!(text.contains("keys stored: 2"));
        assert!(text.contains("table A size: 1"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["key_count"], 2);
        assert_eq!(json["table_b_size"], 1);
    }
}
