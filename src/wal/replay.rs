//! WAL Replay
//!
//! Rebuilds MemTable state from the log at startup.

use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{LodeError, Result};
use crate::memtable::MemTable;

use super::reader::WalReader;
use super::record::OpType;

/// Summary of a replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records applied to the MemTable
    pub records_applied: u64,
    pub puts: u64,
    pub deletes: u64,
    /// Bytes covered by applied records
    pub bytes_consumed: u64,
    /// Offset of a partial trailing record that was dropped
    pub truncated_tail: Option<u64>,
}

/// Replay the WAL at `path` into `memtable`
///
/// - Missing file: nothing to replay, succeeds with empty stats.
/// - Clean end of file or a torn trailing record: stops and succeeds; the
///   partial record was never acknowledged and is dropped.
/// - Unknown op tag in a complete record: `LodeError::CorruptLog`.
/// - Any other I/O failure is returned as is.
///
/// `memtable` is expected to be empty and mutable. Records decoded before
/// an error are left applied.
pub fn replay(path: &Path, memtable: &mut MemTable) -> Result<ReplayStats> {
    let mut reader = match WalReader::open(path) {
        Ok(reader) => reader,
        Err(LodeError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no WAL to replay");
            return Ok(ReplayStats::default());
        }
        Err(e) => return Err(e),
    };

    let mut stats = ReplayStats::default();

    for record in reader.by_ref() {
        let record = record?;
        match record.op {
            OpType::Put => {
                memtable.put(record.key, record.value)?;
                stats.puts += 1;
            }
            OpType::Delete => {
                memtable.delete(record.key)?;
                stats.deletes += 1;
            }
        }
        stats.records_applied += 1;
    }

    stats.bytes_consumed = reader.offset();
    stats.truncated_tail = reader.truncated_tail();

    if let Some(offset) = stats.truncated_tail {
        warn!(
            path = %path.display(),
            offset,
            "dropped partial record at end of WAL"
        );
    }
    info!(
        path = %path.display(),
        records = stats.records_applied,
        puts = stats.puts,
        deletes = stats.deletes,
        "WAL replay complete"
    );

    Ok(stats)
}
