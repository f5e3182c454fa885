//! SSTable Module
//!
//! Sorted String Table - immutable on-disk sorted key-value storage.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Data (variable, no header or footer)                    │
//! │   [KeyLen: u32 LE][Key][ValLen: u32 LE][Value]          │
//! │   ... repeated for each entry, keys strictly ascending  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! No operation tag is stored: a tombstone is written as a zero-length
//! value and reads back exactly like a genuinely empty value.

mod builder;
mod iterator;
mod reader;

use std::path::{Path, PathBuf};

pub use builder::{write_sstable, SSTableBuilder};
pub use iterator::SSTableIterator;

/// The one table name used per data directory. There is no persisted
/// sequence number, so every flush targets this path.
const SSTABLE_FILENAME: &str = "sstable-000001.db";

/// Path of the table file inside `dir`
pub fn sstable_path(dir: &Path) -> PathBuf {
    dir.join(SSTABLE_FILENAME)
}

/// Handle to an immutable table on disk
///
/// Holds no open file: each lookup opens its own handle, so a shared
/// `&SSTable` can serve concurrent readers.
#[derive(Debug, Clone)]
pub struct SSTable {
    path: PathBuf,
    file_size: u64,
}
