//! SSTable Iterator
//!
//! Sequential iteration over all entries in an SSTable.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::Result;
use crate::io_util::{read_exact_or_eof, read_full};

/// Iterator over SSTable entries in ascending key order
///
/// Yields `(key, value)`; a tombstone comes back as an empty value. A decode
/// failure is yielded once as `Err`, after which iteration stops.
pub struct SSTableIterator {
    reader: BufReader<File>,
    done: bool,
}

impl SSTableIterator {
    pub(super) fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            done: false,
        })
    }

    fn read_entry(&mut self) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        let mut len_buf = [0u8; 4];
        match read_full(&mut self.reader, &mut len_buf)? {
            0 => return Ok(None),
            4 => {}
            _ => return Err(truncated("key length").into()),
        }
        let key = read_exact_or_eof(&mut self.reader, u32::from_le_bytes(len_buf))?
            .ok_or_else(|| truncated("key"))?;

        if read_full(&mut self.reader, &mut len_buf)? != 4 {
            return Err(truncated("value length").into());
        }
        let value = read_exact_or_eof(&mut self.reader, u32::from_le_bytes(len_buf))?
            .ok_or_else(|| truncated("value"))?;

        Ok(Some((key, value)))
    }
}

impl Iterator for SSTableIterator {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn truncated(field: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("SSTable record truncated in {}", field),
    )
}
