//! WAL record definitions
//!
//! Framing for a single log record and its fixed header.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;
use crate::io_util::length_field;

/// Header size: Op (1) + KeyLen (4) + ValLen (4)
pub const HEADER_SIZE: usize = 9;

/// Operations that can be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpType {
    Put = 1,
    Delete = 2,
}

impl TryFrom<u8> for OpType {
    type Error = u8;

    fn try_from(tag: u8) -> std::result::Result<Self, u8> {
        match tag {
            1 => Ok(OpType::Put),
            2 => Ok(OpType::Delete),
            other => Err(other),
        }
    }
}

/// A single decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalRecord {
    pub op: OpType,
    pub key: Vec<u8>,
    /// Empty for deletes
    pub value: Vec<u8>,
}

impl WalRecord {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            op: OpType::Put,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self {
            op: OpType::Delete,
            key: key.into(),
            value: Vec::new(),
        }
    }

    /// Total bytes this record occupies on disk
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.key.len() + self.value.len()
    }

    /// Serialize to the on-disk layout
    pub fn encode(&self) -> Result<BytesMut> {
        encode_record(self.op, &self.key, &self.value)
    }
}

/// Serialize a record without taking ownership of key/value
pub(crate) fn encode_record(op: OpType, key: &[u8], value: &[u8]) -> Result<BytesMut> {
    let key_len = length_field(key.len())?;
    let value_len = length_field(value.len())?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + key.len() + value.len());
    buf.put_u8(op as u8);
    buf.put_u32_le(key_len);
    buf.put_u32_le(value_len);
    buf.put_slice(key);
    buf.put_slice(value);
    Ok(buf)
}

/// Raw header as read from disk. The op tag is kept unvalidated so that a
/// bad tag can be reported after the whole record has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub op: u8,
    pub key_len: u32,
    pub value_len: u32,
}

impl RecordHeader {
    pub fn decode(raw: &[u8; HEADER_SIZE]) -> Self {
        let mut buf = &raw[..];
        Self {
            op: buf.get_u8(),
            key_len: buf.get_u32_le(),
            value_len: buf.get_u32_le(),
        }
    }

    /// Key plus value bytes following the header
    pub fn payload_len(&self) -> u64 {
        u64::from(self.key_len) + u64::from(self.value_len)
    }
}
