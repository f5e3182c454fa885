//! Engine Module
//!
//! Lifecycle glue around one MemTable + WAL generation and the table it
//! flushes into.
//!
//! ## Responsibilities
//! - Replay the WAL before accepting operations
//! - Log every mutation before applying it ("durable before visible")
//! - Seal, flush and reset the MemTable, then start a fresh WAL segment
//!
//! Read fan-out across several table generations lives outside this
//! module. There is a single table slot per data directory, so once a table
//! exists `flush` refuses to overwrite it.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{LodeError, Result};
use crate::memtable::{MemTable, MemTableEntry};
use crate::storage::{write_sstable, SSTable};
use crate::wal::{replay, ReplayStats, Wal};

/// The storage engine for one data directory
///
/// ## Concurrency Model: single owner
///
/// Mutations take `&mut self`; the MemTable has no lock of its own. To
/// share an engine between threads, wrap it in `parking_lot::RwLock`
/// (one writer, many readers).
#[derive(Debug)]
pub struct Engine {
    config: Config,
    wal: Wal,
    memtable: MemTable,
    sstable: Option<SSTable>,
    replay_stats: ReplayStats,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Replay the WAL into a fresh MemTable
    /// 3. Open the WAL for appending, cutting any torn tail replay dropped
    /// 4. Open the table file if one exists
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let wal_path = config.wal_path();
        let mut memtable = MemTable::new(config.memtable_size_limit);
        let replay_stats = replay(&wal_path, &mut memtable)?;

        let wal = Wal::open_with_valid_len(&wal_path, replay_stats.bytes_consumed)?;

        let sstable_path = config.sstable_path();
        let sstable = if sstable_path.exists() {
            Some(SSTable::open(&sstable_path)?)
        } else {
            None
        };

        info!(
            data_dir = %config.data_dir.display(),
            recovered = replay_stats.records_applied,
            has_sstable = sstable.is_some(),
            "engine opened"
        );

        Ok(Self {
            config,
            wal,
            memtable,
            sstable,
            replay_stats,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Put a key-value pair: WAL first, then MemTable
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        self.wal.append_put(key, value)?;
        self.memtable.put(key.to_vec(), value.to_vec())
    }

    /// Delete a key: WAL first, then a MemTable tombstone
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        self.wal.append_delete(key)?;
        self.memtable.delete(key.to_vec())
    }

    // Checked before logging so a rejected write never reaches the WAL.
    fn ensure_writable(&self) -> Result<()> {
        if self.memtable.is_immutable() {
            return Err(LodeError::ImmutableMemTable);
        }
        Ok(())
    }

    /// Get a value by key
    ///
    /// Search order:
    /// 1. MemTable (a tombstone here means deleted)
    /// 2. The flushed table
    ///
    /// The table stores a tombstone as an empty value, so an empty value
    /// reads as absent in both layers and a flush never changes a result.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let value = match self.memtable.get(key) {
            Some(MemTableEntry::Value(value)) => Some(value.clone()),
            Some(MemTableEntry::Tombstone) => return None,
            None => self.sstable.as_ref().and_then(|table| table.get(key)),
        };
        value.filter(|value| !value.is_empty())
    }

    /// Whether the MemTable has crossed its threshold
    pub fn is_full(&self) -> bool {
        self.memtable.is_full()
    }

    /// Flush the MemTable to the table file and start a new generation
    ///
    /// Returns `None` without touching disk when the MemTable is empty, so
    /// the single table slot is only spent on real data.
    ///
    /// Steps:
    /// 1. Seal the MemTable
    /// 2. Write and sync the table
    /// 3. Reset the MemTable
    /// 4. Truncate the WAL, starting a fresh segment
    ///
    /// If step 2 fails the MemTable stays sealed and writes are rejected
    /// until a retried `flush` succeeds; the WAL still covers the data.
    /// A crash between 2 and 4 replays the old WAL on restart, which only
    /// repeats records already in the table.
    pub fn flush(&mut self) -> Result<Option<SSTable>> {
        if self.memtable.is_empty() {
            debug!("nothing to flush");
            return Ok(None);
        }
        if self.sstable.is_some() {
            return Err(LodeError::TableExists(self.config.sstable_path()));
        }

        self.memtable.mark_immutable();
        let table = write_sstable(&self.config.data_dir, &self.memtable)?;

        self.memtable.reset();
        self.sstable = Some(table.clone());
        self.wal.truncate()?;

        info!(path = %table.path().display(), "flushed generation");
        Ok(Some(table))
    }

    /// Close the engine gracefully, syncing the WAL
    pub fn close(self) -> Result<()> {
        self.wal.close()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn memtable(&self) -> &MemTable {
        &self.memtable
    }

    pub fn sstable(&self) -> Option<&SSTable> {
        self.sstable.as_ref()
    }

    /// What the startup replay recovered
    pub fn replay_stats(&self) -> &ReplayStats {
        &self.replay_stats
    }
}
