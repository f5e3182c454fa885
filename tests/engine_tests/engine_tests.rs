//! Engine Tests
//!
//! Tests verify:
//! - Write path logs before applying
//! - Startup replays the WAL
//! - Flush seals, writes the table, resets and truncates the WAL
//! - Reads fall through from MemTable to the table
//! - The single table slot is never overwritten

#[path = "../common/mod.rs"]
mod common;

use std::fs;

use lodekv::{Config, Engine, LodeError};
use tempfile::TempDir;

fn setup_engine(limit: usize) -> (TempDir, Config, Engine) {
    common::init_tracing();
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path().join("data"))
        .memtable_size_limit(limit)
        .build();
    let engine = Engine::open(config.clone()).unwrap();
    (temp, config, engine)
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults_and_paths() {
    let config = Config::default();
    assert_eq!(config.memtable_size_limit, 4 * 1024 * 1024);
    assert!(config.validate().is_ok());

    let config = Config::builder().data_dir("/tmp/lode").build();
    assert_eq!(config.wal_path(), std::path::Path::new("/tmp/lode/wal.log"));
    assert_eq!(
        config.sstable_path(),
        std::path::Path::new("/tmp/lode/sstable-000001.db")
    );
}

#[test]
fn test_open_rejects_zero_limit() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .memtable_size_limit(0)
        .build();

    assert!(matches!(Engine::open(config), Err(LodeError::Config(_))));
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_put_is_logged_before_visible() {
    let (_temp, config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"1").unwrap();

    assert_eq!(engine.get(b"a"), Some(b"1".to_vec()));
    let wal_bytes = fs::read(config.wal_path()).unwrap();
    assert_eq!(wal_bytes, common::raw_wal_record(1, b"a", b"1"));
}

#[test]
fn test_delete_hides_value() {
    let (_temp, _config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"1").unwrap();
    engine.delete(b"a").unwrap();

    assert_eq!(engine.get(b"a"), None);
    assert_eq!(engine.get(b"never"), None);
}

#[test]
fn test_is_full_follows_memtable() {
    let (_temp, _config, mut engine) = setup_engine(10);

    engine.put(b"key1", b"01234").unwrap();
    assert!(!engine.is_full());
    engine.put(b"key2", b"56789").unwrap();
    assert!(engine.is_full());
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_reopen_replays_wal() {
    let (_temp, config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"1").unwrap();
    engine.put(b"b", b"2").unwrap();
    engine.delete(b"a").unwrap();
    // Simulated crash: no close, no flush
    drop(engine);

    let engine = Engine::open(config).unwrap();

    assert_eq!(engine.replay_stats().records_applied, 3);
    assert_eq!(engine.get(b"a"), None);
    assert_eq!(engine.get(b"b"), Some(b"2".to_vec()));
}

#[test]
fn test_reopen_drops_torn_append() {
    let (_temp, config, mut engine) = setup_engine(1024);
    engine.put(b"a", b"1").unwrap();
    engine.close().unwrap();

    // Half a record at the tail, as if the process died mid-write
    let mut wal_bytes = fs::read(config.wal_path()).unwrap();
    let torn = common::raw_wal_record(1, b"b", b"2");
    wal_bytes.extend_from_slice(&torn[..6]);
    fs::write(config.wal_path(), &wal_bytes).unwrap();

    let engine = Engine::open(config).unwrap();

    assert!(engine.replay_stats().truncated_tail.is_some());
    assert_eq!(engine.get(b"a"), Some(b"1".to_vec()));
    assert_eq!(engine.get(b"b"), None);
}

#[test]
fn test_write_after_torn_tail_survives_restart() {
    let (_temp, config, mut engine) = setup_engine(1024);
    engine.put(b"a", b"1").unwrap();
    engine.close().unwrap();

    let mut wal_bytes = fs::read(config.wal_path()).unwrap();
    wal_bytes.extend_from_slice(&common::raw_wal_record(1, b"b", b"2")[..6]);
    fs::write(config.wal_path(), &wal_bytes).unwrap();

    // Reopen cuts the torn bytes, then acknowledged writes follow
    let mut engine = Engine::open(config.clone()).unwrap();
    engine.put(b"c", b"3").unwrap();
    engine.put(b"d", b"4").unwrap();
    drop(engine);

    let engine = Engine::open(config).unwrap();

    assert_eq!(engine.replay_stats().records_applied, 3);
    assert_eq!(engine.replay_stats().truncated_tail, None);
    assert_eq!(engine.get(b"a"), Some(b"1".to_vec()));
    assert_eq!(engine.get(b"b"), None);
    assert_eq!(engine.get(b"c"), Some(b"3".to_vec()));
    assert_eq!(engine.get(b"d"), Some(b"4".to_vec()));
}

#[test]
fn test_open_fails_on_corrupt_wal() {
    let (_temp, config, engine) = setup_engine(1024);
    engine.close().unwrap();

    fs::write(config.wal_path(), common::raw_wal_record(5, b"a", b"1")).unwrap();

    assert!(matches!(
        Engine::open(config),
        Err(LodeError::CorruptLog { offset: 0, op: 5 })
    ));
}

// =============================================================================
// Flush Tests
// =============================================================================

#[test]
fn test_flush_moves_data_to_sstable() {
    let (_temp, config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"1").unwrap();
    engine.put(b"b", b"2").unwrap();
    engine.delete(b"a").unwrap();

    let table = engine.flush().unwrap().expect("table written");

    assert_eq!(table.path(), config.sstable_path().as_path());
    assert!(engine.memtable().is_empty());
    assert!(!engine.memtable().is_immutable());
    assert_eq!(fs::metadata(config.wal_path()).unwrap().len(), 0);

    // Served from the table now
    assert_eq!(engine.get(b"b"), Some(b"2".to_vec()));
    assert_eq!(engine.get(b"a"), None);
    assert_eq!(table.get(b"a"), Some(Vec::new()));
}

#[test]
fn test_empty_value_reads_absent_across_flush() {
    let (_temp, _config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"").unwrap();
    engine.put(b"b", b"2").unwrap();
    assert_eq!(engine.get(b"a"), None);

    engine.flush().unwrap();

    assert_eq!(engine.get(b"a"), None);
    assert_eq!(engine.get(b"b"), Some(b"2".to_vec()));
}

#[test]
fn test_flush_empty_memtable_keeps_table_slot() {
    let (_temp, config, mut engine) = setup_engine(1024);

    assert!(engine.flush().unwrap().is_none());
    assert!(engine.sstable().is_none());
    assert!(!config.sstable_path().exists());
    assert!(!engine.memtable().is_immutable());

    engine.put(b"a", b"1").unwrap();
    assert!(engine.flush().unwrap().is_some());
    assert_eq!(engine.get(b"a"), Some(b"1".to_vec()));
}

#[test]
fn test_memtable_shadows_sstable() {
    let (_temp, _config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"old").unwrap();
    engine.put(b"b", b"keep").unwrap();
    engine.flush().unwrap();

    engine.put(b"a", b"new").unwrap();
    engine.delete(b"b").unwrap();

    assert_eq!(engine.get(b"a"), Some(b"new".to_vec()));
    assert_eq!(engine.get(b"b"), None);
}

#[test]
fn test_reopen_after_flush() {
    let (_temp, config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"1").unwrap();
    engine.flush().unwrap();
    engine.put(b"b", b"2").unwrap();
    engine.close().unwrap();

    let engine = Engine::open(config).unwrap();

    assert!(engine.sstable().is_some());
    assert_eq!(engine.replay_stats().records_applied, 1);
    assert_eq!(engine.get(b"a"), Some(b"1".to_vec()));
    assert_eq!(engine.get(b"b"), Some(b"2".to_vec()));
}

#[test]
fn test_second_flush_refused() {
    let (_temp, config, mut engine) = setup_engine(1024);

    engine.put(b"a", b"1").unwrap();
    engine.flush().unwrap();
    engine.put(b"b", b"2").unwrap();

    match engine.flush() {
        Err(LodeError::TableExists(path)) => assert_eq!(path, config.sstable_path()),
        other => panic!("expected TableExists, got {:?}", other),
    }

    // Nothing was lost or sealed
    assert_eq!(engine.get(b"a"), Some(b"1".to_vec()));
    assert_eq!(engine.get(b"b"), Some(b"2".to_vec()));
    engine.put(b"c", b"3").unwrap();
}

#[test]
fn test_open_path_uses_defaults() {
    common::init_tracing();
    let temp = TempDir::new().unwrap();

    let mut engine = Engine::open_path(temp.path()).unwrap();
    engine.put(b"k", b"v").unwrap();

    assert_eq!(engine.config().memtable_size_limit, 4 * 1024 * 1024);
    assert!(temp.path().join("wal.log").exists());
}
