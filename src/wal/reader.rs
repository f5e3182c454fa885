//! WAL Reader
//!
//! Decodes records sequentially and tells a clean end of log apart from a
//! torn trailing record.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{LodeError, Result};
use crate::io_util::{read_exact_or_eof, read_full};

use super::record::{OpType, RecordHeader, WalRecord, HEADER_SIZE};

/// Result of one decode step
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete record with a valid tag
    Record(WalRecord),
    /// The next header would start exactly at end of file
    End,
    /// The log ends partway through a record starting at `offset`
    Truncated { offset: u64 },
}

/// Reads records from a WAL stream
pub struct WalReader<R> {
    inner: R,
    /// Byte offset of the next record
    offset: u64,
    truncated_tail: Option<u64>,
    done: bool,
}

impl WalReader<BufReader<File>> {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> WalReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            truncated_tail: None,
            done: false,
        }
    }

    /// Bytes consumed by complete records so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Where the dropped partial record began, once one has been seen
    pub fn truncated_tail(&self) -> Option<u64> {
        self.truncated_tail
    }

    /// Decode the next record
    ///
    /// The payload is read from the header lengths whatever the tag says;
    /// the tag is only validated once the whole record is in hand, so a bad
    /// tag is `CorruptLog` while a short read is `Truncated`.
    pub fn next_record(&mut self) -> Result<ReadOutcome> {
        let start = self.offset;

        let mut raw = [0u8; HEADER_SIZE];
        match read_full(&mut self.inner, &mut raw)? {
            0 => return Ok(ReadOutcome::End),
            n if n < HEADER_SIZE => return Ok(ReadOutcome::Truncated { offset: start }),
            _ => {}
        }
        let header = RecordHeader::decode(&raw);

        let Some(key) = read_exact_or_eof(&mut self.inner, header.key_len)? else {
            return Ok(ReadOutcome::Truncated { offset: start });
        };
        let Some(value) = read_exact_or_eof(&mut self.inner, header.value_len)? else {
            return Ok(ReadOutcome::Truncated { offset: start });
        };

        self.offset = start + HEADER_SIZE as u64 + header.payload_len();

        let op = OpType::try_from(header.op)
            .map_err(|op| LodeError::CorruptLog { offset: start, op })?;

        Ok(ReadOutcome::Record(WalRecord { op, key, value }))
    }
}

impl<R: Read> Iterator for WalReader<R> {
    type Item = Result<WalRecord>;

    /// Yields records until the end of the log or a torn tail. An error is
    /// yielded once, after which the iterator is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(ReadOutcome::Record(record)) => Some(Ok(record)),
            Ok(ReadOutcome::End) => {
                self.done = true;
                None
            }
            Ok(ReadOutcome::Truncated { offset }) => {
                self.done = true;
                self.truncated_tail = Some(offset);
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
