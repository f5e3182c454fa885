//! MemTable Module
//!
//! In-memory data structure for the current generation's writes.
//!
//! ## Responsibilities
//! - Last-write-wins key/value state with tombstones
//! - Track live value bytes for the flush threshold
//! - One-way seal (immutable) before flush, reset afterwards
//! - Ordered iteration for SSTable creation
//!
//! ## Data Structure Choice
//! A plain BTreeMap owned by a single writer:
//! - Ordered keys (required for SSTable generation)
//! - No internal locking; shared access goes through an external
//!   `parking_lot::RwLock` held by the caller

mod table;

pub use table::{MemTable, SortedEntries};

/// Entry stored in the MemTable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemTableEntry {
    /// A live value
    Value(Vec<u8>),

    /// A tombstone (deleted key)
    Tombstone,
}

impl MemTableEntry {
    /// Bytes as they are persisted. A tombstone is a zero-length value.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MemTableEntry::Value(v) => v,
            MemTableEntry::Tombstone => &[],
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, MemTableEntry::Tombstone)
    }

    /// Bytes counted against the size threshold
    pub(crate) fn live_len(&self) -> usize {
        self.as_bytes().len()
    }
}
