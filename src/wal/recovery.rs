//! WAL Recovery
//!
//! Handles crash recovery by reading back the WAL.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, StrataError};

use super::{WalEntry, WalReader, WalRecord};

/// Handles WAL recovery after crash
pub struct WalRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of corrupted entries skipped
    pub entries_corrupted: u64,

    /// Highest valid LSN seen (0 when there is none)
    pub last_lsn: u64,

    /// Whether a torn tail was found (and, for `recover`, cut off)
    pub was_truncated: bool,
}

impl WalRecovery {
    /// Recover entries from a WAL file
    ///
    /// This will:
    /// 1. Read all valid entries
    /// 2. Skip corrupted lines with a warning
    /// 3. Truncate a partial write at the end
    /// 4. Return all valid entries in order
    ///
    /// A missing file is a fresh start, not an error.
    pub fn recover(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult)> {
        let (entries, result, valid_len) = Self::scan(path)?;

        if let Some(valid_len) = valid_len {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(valid_len)?;
            file.sync_all()?;
            tracing::warn!(
                "WAL {:?} ended in a partial record; truncated to {} bytes",
                path,
                valid_len
            );
        }

        Ok((entries, result))
    }

    /// Read all valid entries without modifying the file
    pub fn read(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult)> {
        let (entries, result, _) = Self::scan(path)?;
        Ok((entries, result))
    }

    /// Verify integrity of a WAL file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        Self::read(path).map(|(_, result)| result)
    }

    fn scan(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult, Option<u64>)> {
        let reader = match WalReader::open(path) {
            Ok(reader) => reader,
            Err(StrataError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Ok((Vec::new(), RecoveryResult::default(), None));
            }
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        let mut result = RecoveryResult::default();
        let mut torn_at = None;

        for record in reader.records() {
            match record? {
                WalRecord::Valid(entry) => {
                    result.entries_recovered += 1;
                    result.last_lsn = result.last_lsn.max(entry.lsn);
                    entries.push(entry);
                }
                WalRecord::Corrupt { line, reason } => {
                    result.entries_corrupted += 1;
                    tracing::warn!("skipping corrupt WAL record at line {}: {}", line, reason);
                }
                WalRecord::Torn { valid_len } => {
                    result.was_truncated = true;
                    torn_at = Some(valid_len);
                }
            }
        }

        Ok((entries, result, torn_at))
    }
}
