//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through append-only logging.
//!
//! ## Responsibilities
//! - Append log entries before any mutation is applied in memory
//! - CRC32 checksums for corruption detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Crash recovery and replay
//!
//! ## File Format
//! Newline-delimited, one self-describing record per line:
//! ```text
//! ┌──────────────┬───┬──────────────────────────────────────┬────┐
//! │ CRC32 (8 hex)│ ␠ │ {"lsn":..,"timestamp":..,"operation"}│ \n │
//! └──────────────┴───┴──────────────────────────────────────┴────┘
//! ```
//! The CRC covers the JSON payload only.

mod entry;
mod writer;
mod reader;
mod recovery;

pub use entry::{compute_crc, Operation, WalEntry, CRC_HEX_LEN};
pub use writer::WalWriter;
pub use reader::{WalIterator, WalReader, WalRecord};
pub use recovery::{RecoveryResult, WalRecovery};

/// File name of the log inside the data directory
pub const WAL_FILENAME: &str = "wal.log";
