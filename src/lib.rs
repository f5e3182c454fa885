//! # LodeKV
//!
//! A single-node key-value storage core with:
//! - Write-Ahead Logging (WAL), synced before every acknowledged write
//! - Crash replay that drops a torn trailing record
//! - A bounded MemTable with tombstones
//! - Immutable, key-sorted on-disk tables with early-exit point lookups
//!
//! ## Architecture Overview
//!
//! ```text
//!            put / delete                      get
//!                 │                             │
//!                 ▼                             │
//!          ┌─────────────┐                      │
//!          │     WAL     │ (1) durable          │
//!          │  (Append)   │                      │
//!          └──────┬──────┘                      │
//!                 ▼                             ▼
//!          ┌─────────────┐  (2) visible  ┌─────────────┐
//!          │  MemTable   │◄──────────────┤ Engine glue │
//!          │ (BTreeMap)  │               └──────┬──────┘
//!          └──────┬──────┘                      │
//!                 │ seal + flush                │ miss
//!                 ▼                             ▼
//!          ┌─────────────────────────────────────────┐
//!          │         SSTable (sorted, immutable)     │
//!          └─────────────────────────────────────────┘
//! ```
//!
//! On startup the WAL is replayed into a fresh MemTable before any
//! operation is accepted.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod wal;
pub mod memtable;
pub mod storage;
pub mod engine;

mod io_util;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LodeError, Result};
pub use config::Config;
pub use engine::Engine;
pub use memtable::{MemTable, MemTableEntry};
pub use storage::{write_sstable, SSTable};
pub use wal::{replay, Wal};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LodeKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
