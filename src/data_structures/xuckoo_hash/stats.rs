// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bookkeeping counters for a Xuckoo table.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Counters maintained alongside the two directory tables.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Buckets created by splits
    bucket_count: usize,

    /// Keys stored across both tables
    key_count: usize,

    /// Time spent inside public operations. Lookups take `&self`, hence the cell.
    elapsed: Cell<Duration>,

    /// Whether `elapsed` is maintained at all
    track_time: bool,
}

impl Stats {
    /// Creates zeroed statistics.
    pub fn new(track_time: bool) -> Self {
        Self {
            track_time,
            ..Self::default()
        }
    }

    /// Number of buckets created by splits.
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Number of keys stored.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Accumulated processing time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    pub(crate) fn record_split(&mut self) {
        self.bucket_count += 1;
    }

    pub(crate) fn revert_split(&mut self) {
        self.bucket_count -= 1;
    }

    pub(crate) fn record_key(&mut self) {
        self.key_count += 1;
    }

    /// Starts timing an operation, if time tracking is enabled.
    pub(crate) fn start(&self) -> Option<Instant> {
        self.track_time.then(Instant::now)
    }

    /// Adds the time since `started` to the running total.
    pub(crate) fn finish(&self, started: Option<Instant>) {
        if let Some(started) = started {
            self.elapsed.set(self.elapsed.get() + started.elapsed());
        }
    }
}

/// Buckets released when a table is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
    /// Buckets released from table A
    pub table_a: usize,
    /// Buckets released from table B
    pub table_b: usize,
}

impl TeardownReport {
    /// Buckets released from both tables.
    pub fn total(&self) -> usize {
        self.table_a + self.table_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = Stats::new(false);
        stats.record_split();
        stats.record_split();
        stats.revert_split();
        stats.record_key();

        assert_eq!(stats.bucket_count(), 1);
        assert_eq!(stats.key_count(), 1);
    }

    #[test]
    fn test_time_tracking_disabled() {
        let stats = Stats::new(false);
        let started = stats.start();
        assert!(started.is_none());
        stats.finish(started);
        assert_eq!(stats.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_time_tracking_accumulates() {
        let stats = Stats::new(true);
        let started = stats.start();
        assert!(started.is_some());
        std::thread::sleep(Duration::from_millis(2));
        stats.finish(started);

        let first = stats.elapsed();
        assert!(first >= Duration::from_millis(2));

        stats.finish(stats.start());
        assert!(stats.elapsed() >= first);
    }
}
