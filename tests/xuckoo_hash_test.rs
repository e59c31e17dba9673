// Copyright (c) 2025 Xuckoo Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integration tests for the Xuckoo hash table.
//! Drives the table through the public API only, the way the binary does.

use std::collections::HashSet;

use xuckoo_lib::config::{get_global_config, table::TableConfig};
use xuckoo_lib::data_structures::xuckoo_hash::{
    FnvXuckooHasher, HasherKind, IdentityHasher, StatsReport, TableId, XuckooHashConfig,
    XuckooHashTable, XuckooHasher,
};
use xuckoo_lib::script::run_script;

#[test]
fn test_identity_walkthrough() {
    let mut table = XuckooHashTable::with_hasher(IdentityHasher);

    assert!(table.insert(5));
    assert!(table.insert(9));
    assert!(table.lookup(5));
    assert!(table.lookup(9));
    assert!(!table.lookup(7));

    // 7 collides with 5 in table A and with 9 in table B
    assert!(table.insert(7));
    assert_eq!(table.len(), 3);
    assert_eq!(table.table_sizes(), (4, 2));
    assert!(table.check_invariants().is_ok());

    let a = table.table(TableId::A);
    assert_eq!(a.bucket_at(1).key(), Some(5));
    assert_eq!(a.bucket_at(3).key(), Some(7));
    assert_eq!(table.table(TableId::B).bucket_at(0).key(), Some(9));

    let report = table.destroy();
    assert_eq!(report.total(), 5);
}

#[test]
fn test_many_keys_default_hasher() {
    let mut table = XuckooHashTable::new();
    let keys: Vec<u64> = (0..5_000u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect();

    for &key in &keys {
        assert!(table.insert(key));
    }
    for &key in &keys {
        assert!(!table.insert(key));
        assert!(table.lookup(key));
    }

    assert_eq!(table.len(), keys.len());
    let stored: HashSet<u64> = table.keys().collect();
    assert_eq!(stored.len(), keys.len());
    assert!(table.check_invariants().is_ok());
}

#[test]
fn test_hasher_kind_matches_concrete_hashers() {
    for key in [0, 1, 42, u64::MAX] {
        assert_eq!(HasherKind::Fnv.h1(key), FnvXuckooHasher.h1(key));
        assert_eq!(HasherKind::Fnv.h2(key), FnvXuckooHasher.h2(key));
        assert_eq!(HasherKind::Identity.h1(key), IdentityHasher.h1(key));
        assert_eq!(HasherKind::Identity.h2(key), IdentityHasher.h2(key));
    }
}

#[test]
fn test_table_from_configuration() {
    let table_config = TableConfig {
        max_table_size: 256,
        track_time: false,
        hasher: HasherKind::Identity,
        ..TableConfig::default()
    };
    let mut table = XuckooHashTable::with_hasher_and_config(
        table_config.hasher,
        XuckooHashConfig::from(&table_config),
    );

    for key in 0..100 {
        assert_eq!(table.try_insert(key), Ok(true));
    }
    assert!(table.table_sizes().0 <= 256);
    assert!(table.stats().elapsed().is_zero());
}

#[test]
fn test_global_config_defaults() {
    xuckoo_lib::init().expect("initialization failed");
    let config = get_global_config();
    assert_eq!(config.get().table.max_table_size, 1 << 24);
}

#[test]
fn test_script_then_json_report() {
    let mut table = XuckooHashTable::with_hasher(IdentityHasher);
    let mut out = Vec::new();

    let summary = run_script(&mut table, "i 5\ni 9\ni 7\nl 7\n".as_bytes(), &mut out)
        .expect("script failed");
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.found, 1);

    let json = serde_json::to_string(&table.report()).expect("report serializes");
    let report: StatsReport = serde_json::from_str(&json).expect("report deserializes");
    assert_eq!(report.key_count, 3);
    assert_eq!(report.bucket_count, 3);
    assert_eq!((report.table_a_size, report.table_b_size), (4, 2));
}
