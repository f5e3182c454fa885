//! Error types for LodeKV
//!
//! Provides a unified error type for all operations. A lookup miss is never
//! an error; it is reported as `None`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using LodeError
pub type Result<T> = std::result::Result<T, LodeError>;

/// Unified error type for LodeKV operations
#[derive(Debug, Error)]
pub enum LodeError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("MemTable is immutable")]
    ImmutableMemTable,

    #[error("MemTable must be immutable to write an SSTable")]
    MutableMemTable,

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL corrupt: unknown operation tag {op} in record at offset {offset}")]
    CorruptLog { offset: u64, op: u8 },

    #[error("Record field of {len} bytes exceeds the 4-byte length limit")]
    RecordTooLarge { len: usize },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("SSTable keys must be strictly ascending")]
    UnsortedKey,

    #[error("SSTable already exists at {}", .0.display())]
    TableExists(PathBuf),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LodeError {
    /// True for the two state-machine violations (sealed/unsealed MemTable)
    pub fn is_state_error(&self) -> bool {
        matches!(self, LodeError::ImmutableMemTable | LodeError::MutableMemTable)
    }
}
