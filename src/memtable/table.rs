//! MemTable implementation
//!
//! BTreeMap-based memtable with a live-bytes counter and a seal flag.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{LodeError, Result};

use super::MemTableEntry;

/// In-memory table for recent writes
///
/// State machine: `Mutable → mark_immutable → Immutable → reset → Mutable`.
/// `put`/`delete` only succeed while mutable; `get` always works.
#[derive(Debug)]
pub struct MemTable {
    data: BTreeMap<Vec<u8>, MemTableEntry>,
    /// Sum of live value lengths; tombstones count zero
    current_size: usize,
    max_size: usize,
    immutable: bool,
}

impl MemTable {
    /// Create a new empty MemTable that reports full at `max_size` live bytes
    pub fn new(max_size: usize) -> Self {
        Self {
            data: BTreeMap::new(),
            current_size: 0,
            max_size,
            immutable: false,
        }
    }

    /// Insert or overwrite a key. Last write wins.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.insert(key, MemTableEntry::Value(value))
    }

    /// Record a tombstone for a key, whether or not it was written before
    pub fn delete(&mut self, key: Vec<u8>) -> Result<()> {
        self.insert(key, MemTableEntry::Tombstone)
    }

    fn insert(&mut self, key: Vec<u8>, entry: MemTableEntry) -> Result<()> {
        if self.immutable {
            return Err(LodeError::ImmutableMemTable);
        }

        let added = entry.live_len();
        if let Some(old) = self.data.insert(key, entry) {
            self.current_size -= old.live_len();
        }
        self.current_size += added;

        Ok(())
    }

    /// Look up a key in this generation
    ///
    /// - `None`: never written in this generation
    /// - `Some(MemTableEntry::Tombstone)`: deleted in this generation
    pub fn get(&self, key: &[u8]) -> Option<&MemTableEntry> {
        self.data.get(key)
    }

    /// Threshold signal for the flush orchestrator. Writes keep succeeding
    /// past it.
    pub fn is_full(&self) -> bool {
        self.current_size >= self.max_size
    }

    /// Seal the table. Idempotent.
    pub fn mark_immutable(&mut self) {
        self.immutable = true;
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Drop all entries and reopen for the next generation.
    ///
    /// Only call once the contents are durable in an SSTable.
    pub fn reset(&mut self) {
        self.data.clear();
        self.current_size = 0;
        self.immutable = false;
    }

    /// Entries in strictly ascending key order. Each call starts over.
    pub fn sorted_entries(&self) -> SortedEntries<'_> {
        SortedEntries {
            inner: self.data.iter(),
        }
    }

    /// Live value bytes currently held
    pub fn size(&self) -> usize {
        self.current_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of keys, tombstones included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Iterator over MemTable entries in key order
pub struct SortedEntries<'a> {
    inner: btree_map::Iter<'a, Vec<u8>, MemTableEntry>,
}

impl<'a> Iterator for SortedEntries<'a> {
    type Item = (&'a [u8], &'a MemTableEntry);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_slice(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SortedEntries<'_> {}
