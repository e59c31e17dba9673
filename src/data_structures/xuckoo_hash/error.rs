// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the Xuckoo hash table.

use super::hash::TableId;

/// Errors that can occur in Xuckoo hash table operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum XuckooHashError {
    /// Doubling a directory table would exceed the configured ceiling.
    #[error("Table {table} cannot grow to {requested} slots, limit is {limit}")]
    TableTooLarge {
        /// The table that attempted to grow
        table: TableId,
        /// Size the table would have had after doubling
        requested: usize,
        /// Configured maximum table size
        limit: usize,
    },

    /// A structural invariant does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for Xuckoo hash table operations
pub type Result<T> = std::result::Result<T, XuckooHashError>;
