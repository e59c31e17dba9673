//! Hash table configuration module.
//!
//! Serializable settings for the Xuckoo hash table: directory ceiling, cycle
//! threshold, time accounting and the hash function pair.

use serde::{Deserialize, Serialize};

use super::{ConfigResult, Validate};
use crate::data_structures::xuckoo_hash::{
    HasherKind, XuckooHashConfig, DEFAULT_MAX_TABLE_SIZE, DEFAULT_MIN_CYCLE_LOOPS,
    MIN_CYCLE_LOOPS_FLOOR,
};
use crate::error::config::ConfigError;

/// Hash table configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Maximum number of slots in one directory table (power of two)
    pub max_table_size: usize,

    /// Displacement steps before a chain returning to its origin counts as a cycle
    pub min_cycle_loops: usize,

    /// Whether to accumulate processing time
    pub track_time: bool,

    /// Hash function pair used to address the two tables
    pub hasher: HasherKind,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_table_size: DEFAULT_MAX_TABLE_SIZE,
            min_cycle_loops: DEFAULT_MIN_CYCLE_LOOPS,
            track_time: true,
            hasher: HasherKind::default(),
        }
    }
}

impl Validate for TableConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.max_table_size.is_power_of_two() {
            return Err(ConfigError::ValueOutOfRange {
                key: "table.max_table_size".to_string(),
                message: format!("{} is not a power of two", self.max_table_size),
            });
        }

        if self.min_cycle_loops < MIN_CYCLE_LOOPS_FLOOR {
            return Err(ConfigError::ValueOutOfRange {
                key: "table.min_cycle_loops".to_string(),
                message: format!("must be at least {MIN_CYCLE_LOOPS_FLOOR}"),
            });
        }

        Ok(())
    }
}

impl From<&TableConfig> for XuckooHashConfig {
    fn from(config: &TableConfig) -> Self {
        XuckooHashConfig::new()
            .with_max_table_size(config.max_table_size)
            .with_min_cycle_loops(config.min_cycle_loops)
            .with_time_tracking(config.track_time)
    }
}
