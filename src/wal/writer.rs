//! WAL Writer
//!
//! Handles appending entries to the WAL file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::WalSyncStrategy;
use crate::error::{Result, StrataError};

use super::{Operation, WalEntry, WalRecovery};

/// Writes entries to the WAL file
///
/// Not internally synchronized: the engine owns it behind a mutex, which
/// is what makes appends from concurrent callers land whole and in order.
pub struct WalWriter {
    file: File,
    path: PathBuf,
    sync_strategy: WalSyncStrategy,

    /// LSN handed to the next append
    next_lsn: u64,

    /// End of the last fully written record
    len: u64,

    entries_written: u64,

    /// Set when a failed record could not be cut back off the file. Every
    /// later append is refused, since it would land on the leftover bytes.
    failed: bool,
}

impl WalWriter {
    /// Open or create a WAL file, resuming after its last valid LSN
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let last_lsn = WalRecovery::verify(path)?.last_lsn;
        Self::open_at(path, sync_strategy, last_lsn + 1)
    }

    /// Open or create a WAL file with an explicit next LSN
    pub fn open_at(path: &Path, sync_strategy: WalSyncStrategy, next_lsn: u64) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            sync_strategy,
            next_lsn: next_lsn.max(1),
            len,
            entries_written: 0,
            failed: false,
        })
    }

    /// Append an operation to the WAL and return its LSN.
    ///
    /// The record is durable per the sync strategy when this returns. On
    /// failure nothing of the record is left behind and the LSN is not
    /// consumed. If the partial record cannot be removed, the writer is
    /// marked failed and refuses all further appends until reopened.
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        if self.failed {
            return Err(StrataError::WalWrite(format!(
                "WAL {:?} holds a partial record that could not be rolled back; reopen it to recover",
                self.path
            )));
        }

        let lsn = self.next_lsn;
        let entry = WalEntry::new(lsn, operation);
        let line = entry.serialize()?;

        if let Err(e) = self.write_line(&line) {
            self.rollback();
            return Err(StrataError::WalWrite(format!(
                "append of lsn {} to {:?} failed: {}",
                lsn, self.path, e
            )));
        }

        self.len += line.len() as u64;
        self.next_lsn += 1;
        self.entries_written += 1;

        tracing::trace!(lsn, op = entry.operation.kind(), "wal append");
        Ok(lsn)
    }

    fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.file.write_all(line)?;
        self.file.flush()?;
        if self.sync_strategy == WalSyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Drop whatever part of a failed record reached the file
    fn rollback(&mut self) {
        if let Err(e) = self.file.set_len(self.len) {
            self.failed = true;
            tracing::error!(
                "could not roll WAL {:?} back to {} bytes, refusing further appends: {}",
                self.path,
                self.len,
                e
            );
        }
    }

    /// Whether a failed rollback has made this writer unusable
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file
            .sync_all()
            .map_err(|e| StrataError::WalWrite(format!("sync of {:?} failed: {}", self.path, e)))
    }

    /// Get the LSN the next append will use
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// Number of entries written since open
    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Size of the log in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
