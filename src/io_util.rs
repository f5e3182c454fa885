//! Shared helpers for length-prefixed binary framing.

use std::io::{self, Read};

use crate::error::{LodeError, Result};

/// Convert a field length to its 4-byte on-disk form
pub(crate) fn length_field(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| LodeError::RecordTooLarge { len })
}

/// Fill `buf` as far as the stream allows; returns the number of bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read exactly `len` bytes, or `None` if the stream ends first.
///
/// Grows the buffer as data arrives, so a garbage length field never
/// triggers a huge up-front allocation.
pub(crate) fn read_exact_or_eof<R: Read>(reader: &mut R, len: u32) -> io::Result<Option<Vec<u8>>> {
    let len = u64::from(len);
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Ok(None);
    }
    Ok(Some(buf))
}
