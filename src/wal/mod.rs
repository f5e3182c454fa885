//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through append-only logging.
//!
//! ## Responsibilities
//! - Append a record and sync it before the mutation becomes visible
//! - Serialize concurrent appends so file order equals completion order
//! - Replay the log into a MemTable after a crash
//!
//! ## File Format
//! Every record carries the same 9-byte header regardless of operation, so
//! replay decodes all of them through one code path:
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Record 1                                                │
//! │ ┌────────┬─────────────┬─────────────┬──────┬────────┐ │
//! │ │ Op (1) │ KeyLen (4)  │ ValLen (4)  │ Key  │ Value  │ │
//! │ └────────┴─────────────┴─────────────┴──────┴────────┘ │
//! ├─────────────────────────────────────────────────────────┤
//! │ Record 2 ...                                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! Op is 1 (Put) or 2 (Delete); lengths are little-endian u32. Deletes
//! carry a zero-length value.

mod record;
mod writer;
mod reader;
mod replay;

pub use record::{OpType, RecordHeader, WalRecord, HEADER_SIZE};
pub use writer::{Wal, WalStats};
pub use reader::{ReadOutcome, WalReader};
pub use replay::{replay, ReplayStats};
