// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the Xuckoo hash table.

/// Default ceiling on the number of slots in one directory table.
pub const DEFAULT_MAX_TABLE_SIZE: usize = 1 << 24;

/// Default number of displacement steps after which a chain returning its
/// original key to its original address counts as a cycle.
pub const DEFAULT_MIN_CYCLE_LOOPS: usize = 3;

/// Smallest accepted cycle threshold. Below this a chain starting in table B
/// would be reported as a cycle on its very first step.
pub const MIN_CYCLE_LOOPS_FLOOR: usize = 2;

/// Configuration for the Xuckoo hash table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XuckooHashConfig {
    /// Maximum number of slots in either directory table.
    /// Growth past this size is fatal for `insert` and an error for `try_insert`.
    pub max_table_size: usize,

    /// A chain that brings its original key back to its original address is
    /// only treated as a cycle once more than this many steps were taken.
    pub min_cycle_loops: usize,

    /// Whether to accumulate elapsed time around public operations.
    pub track_time: bool,
}

impl XuckooHashConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum directory size (at least 1 slot).
    pub fn with_max_table_size(mut self, max_table_size: usize) -> Self {
        self.max_table_size = max_table_size.max(1);
        self
    }

    /// Sets the cycle threshold, clamped to [`MIN_CYCLE_LOOPS_FLOOR`].
    pub fn with_min_cycle_loops(mut self, min_cycle_loops: usize) -> Self {
        self.min_cycle_loops = min_cycle_loops.max(MIN_CYCLE_LOOPS_FLOOR);
        self
    }

    /// Enables or disables time accounting.
    pub fn with_time_tracking(mut self, track_time: bool) -> Self {
        self.track_time = track_time;
        self
    }
}

impl Default for XuckooHashConfig {
    fn default() -> Self {
        Self {
            max_table_size: DEFAULT_MAX_TABLE_SIZE,
            min_cycle_loops: DEFAULT_MIN_CYCLE_LOOPS,
            track_time: true,
        }
    }
}
