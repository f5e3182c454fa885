//! SSTable Builder
//!
//! Writes sorted key-value entries to a new SSTable file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{LodeError, Result};
use crate::io_util::length_field;
use crate::memtable::MemTable;

use super::{sstable_path, SSTable};

/// Builder for creating new SSTables from sorted entries
pub struct SSTableBuilder {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Number of entries written
    entry_count: u64,
    /// Previous key, for the ordering check
    last_key: Option<Vec<u8>>,
}

impl SSTableBuilder {
    /// Create (or truncate) the file at `path`
    ///
    /// Call `add()` in strictly ascending key order, then `finish()`.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            entry_count: 0,
            last_key: None,
        })
    }

    /// Append one entry: `[key_len][key][val_len][value]`
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if let Some(last) = &self.last_key {
            if key <= last.as_slice() {
                return Err(LodeError::UnsortedKey);
            }
        }

        let key_len = length_field(key.len())?;
        let val_len = length_field(value.len())?;

        self.writer.write_all(&key_len.to_le_bytes())?;
        self.writer.write_all(key)?;
        self.writer.write_all(&val_len.to_le_bytes())?;
        self.writer.write_all(value)?;

        self.last_key = Some(key.to_vec());
        self.entry_count += 1;
        Ok(())
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Flush, sync to stable storage, and return a read-only handle
    pub fn finish(mut self) -> Result<SSTable> {
        self.writer.flush()?;
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        SSTable::open(&self.path)
    }
}

/// Write a sealed MemTable to the table file in `dir`
///
/// Fails with `LodeError::MutableMemTable` unless the MemTable has been
/// marked immutable. Entries with an empty key are skipped. The file is
/// written in place; a failure can leave a partial file behind, which is
/// harmless while the WAL for this generation still exists.
pub fn write_sstable(dir: &Path, memtable: &MemTable) -> Result<SSTable> {
    if !memtable.is_immutable() {
        return Err(LodeError::MutableMemTable);
    }

    let path = sstable_path(dir);
    let mut builder = SSTableBuilder::new(&path)?;
    let mut skipped = 0usize;

    for (key, entry) in memtable.sorted_entries() {
        if key.is_empty() {
            skipped += 1;
            continue;
        }
        builder.add(key, entry.as_bytes())?;
    }

    if skipped > 0 {
        warn!(skipped, "skipped entries with empty keys");
    }

    let entries = builder.entry_count();
    let table = builder.finish()?;

    info!(
        path = %table.path().display(),
        entries,
        bytes = table.file_size(),
        "wrote SSTable"
    );

    Ok(table)
}
