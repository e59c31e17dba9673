//! Data structures for Xuckoo.
//!
//! The crate currently hosts a single structure, the extendible cuckoo hash
//! table. All implementations adhere to the same rules:
//! - No unsafe code
//! - Single-threaded ownership, no interior locking
//! - Explicit error values for recoverable failures

pub mod xuckoo_hash;

// Re-export common data structures
pub use xuckoo_hash::{XuckooHashConfig, XuckooHashError, XuckooHashTable};
