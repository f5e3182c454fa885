//! SSTable Reader
//!
//! Point lookups by sequential scan with early termination.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

use super::iterator::SSTableIterator;
use super::SSTable;

impl SSTable {
    /// Open a handle to an existing table file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file_size = fs::metadata(&path)?.len();
        Ok(Self { path, file_size })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at open time
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Get a value by key
    ///
    /// Returns:
    /// - `Some(value)`: key present (a tombstone reads as an empty value)
    /// - `None`: key absent, or the file could not be read or decoded
    ///
    /// The scan stops at the first key sorting after `key`.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.scan_for(key) {
            Ok(found) => found,
            Err(e) => {
                // Reported as a miss; the log line is the only trace.
                warn!(path = %self.path.display(), error = %e, "SSTable lookup failed");
                None
            }
        }
    }

    fn scan_for(&self, target: &[u8]) -> Result<Option<Vec<u8>>> {
        for entry in self.iter()? {
            let (key, value) = entry?;
            match key.as_slice().cmp(target) {
                Ordering::Equal => return Ok(Some(value)),
                Ordering::Greater => return Ok(None),
                Ordering::Less => {}
            }
        }
        Ok(None)
    }

    /// Iterate over all entries from the start of the file
    pub fn iter(&self) -> Result<SSTableIterator> {
        SSTableIterator::open(&self.path)
    }
}
