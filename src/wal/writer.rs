//! WAL Writer
//!
//! Appends records to the log file, syncing each one before returning.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::Result;

use super::record::{encode_record, OpType};

/// Append-only log for one MemTable generation
///
/// All appends go through one mutex, so the on-disk order matches the order
/// in which callers see their appends complete. Appends are `&self`; share
/// the log across threads with `Arc<Wal>`.
pub struct Wal {
    path: PathBuf,
    inner: Mutex<WalInner>,
}

struct WalInner {
    file: File,
    /// File length covering only fully written records
    valid_len: u64,
    stats: WalStats,
}

/// Counters since the log was opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalStats {
    pub records_appended: u64,
    pub bytes_written: u64,
}

impl Wal {
    /// Open or create a WAL file in append mode
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_inner(path.as_ref(), None)
    }

    /// Open a WAL whose first `valid_len` bytes hold complete records.
    ///
    /// Anything past `valid_len` (a torn tail found by replay) is cut off
    /// and synced before the handle is returned, so new records never land
    /// behind a partial one.
    pub fn open_with_valid_len(path: impl AsRef<Path>, valid_len: u64) -> Result<Self> {
        Self::open_inner(path.as_ref(), Some(valid_len))
    }

    fn open_inner(path: &Path, keep: Option<u64>) -> Result<Self> {
        let path = path.to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        let mut valid_len = file.metadata()?.len();

        if let Some(keep) = keep.filter(|&keep| keep < valid_len) {
            file.set_len(keep)?;
            file.sync_all()?;
            warn!(
                path = %path.display(),
                dropped_bytes = valid_len - keep,
                "cut torn tail from WAL"
            );
            valid_len = keep;
        }

        debug!(path = %path.display(), existing_bytes = valid_len, "opened WAL");

        Ok(Self {
            path,
            inner: Mutex::new(WalInner {
                file,
                valid_len,
                stats: WalStats::default(),
            }),
        })
    }

    /// Log a put. Returns once the record is on stable storage.
    pub fn append_put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.append(OpType::Put, key, value)
    }

    /// Log a delete. Returns once the record is on stable storage.
    pub fn append_delete(&self, key: &[u8]) -> Result<()> {
        self.append(OpType::Delete, key, &[])
    }

    fn append(&self, op: OpType, key: &[u8], value: &[u8]) -> Result<()> {
        let record = encode_record(op, key, value)?;

        let mut inner = self.inner.lock();

        let written = match inner.file.write_all(&record) {
            // fdatasync also covers the length change of an append.
            Ok(()) => inner.file.sync_data(),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // An unacknowledged record must not stay in front of later ones.
            inner.roll_back(&self.path);
            return Err(e.into());
        }

        let len = record.len() as u64;
        inner.valid_len += len;
        inner.stats.records_appended += 1;
        inner.stats.bytes_written += len;

        trace!(?op, key_len = key.len(), value_len = value.len(), "WAL append");
        Ok(())
    }

    /// Force file data and metadata to disk
    pub fn sync(&self) -> Result<()> {
        self.inner.lock().file.sync_all()?;
        Ok(())
    }

    /// Drop every record and start an empty segment at the same path.
    ///
    /// Only call once the generation's data is durable in an SSTable.
    pub fn truncate(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.file.set_len(0)?;
        inner.file.sync_all()?;
        inner.valid_len = 0;
        inner.stats = WalStats::default();
        debug!(path = %self.path.display(), "truncated WAL");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> WalStats {
        self.inner.lock().stats
    }

    /// Flush and release the file handle
    pub fn close(self) -> Result<()> {
        let inner = self.inner.into_inner();
        inner.file.sync_all()?;
        debug!(
            path = %self.path.display(),
            records = inner.stats.records_appended,
            "closed WAL"
        );
        Ok(())
    }
}

impl WalInner {
    /// Cut the file back to the last acknowledged record
    fn roll_back(&mut self, path: &Path) {
        if let Err(e) = self.file.set_len(self.valid_len) {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to drop unacknowledged WAL record"
            );
        }
    }
}

impl std::fmt::Debug for Wal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wal").field("path", &self.path).finish_non_exhaustive()
    }
}
