//! Storage Module
//!
//! Persistent storage layer using an SSTable format.
//!
//! ## Responsibilities
//! - Persist a sealed MemTable to disk in ascending key order
//! - Point lookups that stop as soon as the scan passes the target key
//! - Simple ascending iteration over a table
//!
//! Merging tables, bloom filters and indexes are not part of this layer.

mod sstable;

pub use sstable::{sstable_path, write_sstable, SSTable, SSTableBuilder, SSTableIterator};
