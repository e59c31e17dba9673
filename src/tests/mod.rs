//! Test modules for Xuckoo.
//!
//! This module contains the crate-internal test suites:
//! - Property-based tests of the hash table using proptest
//! - Table-driven tests using test-case
//! - Adversarial hashing through mockall mocks
//! - Configuration loading against temporary files
//! - Test fixtures and utilities


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{distinct_keys_strategy, key_sequence_strategy, small_key_strategy, TestFixture};
