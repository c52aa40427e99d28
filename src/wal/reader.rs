//! WAL Reader
//!
//! Handles reading records from the WAL file, one line at a time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

use super::WalEntry;

/// One line of the log, classified
#[derive(Debug, Clone, PartialEq)]
pub enum WalRecord {
    /// A well-formed entry
    Valid(WalEntry),

    /// A complete line that failed to decode (1-based line number)
    Corrupt { line: u64, reason: String },

    /// Trailing bytes without a newline: an append cut short by a crash.
    /// `valid_len` is where the last complete line ends.
    Torn { valid_len: u64 },
}

/// Reads records from the WAL file
pub struct WalReader {
    reader: BufReader<File>,

    /// Lines consumed so far
    line: u64,

    /// Byte offset just past the last complete line
    offset: u64,

    finished: bool,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            line: 0,
            offset: 0,
            finished: false,
        })
    }

    /// Read the next record from the WAL.
    ///
    /// Only I/O failures are errors; undecodable lines come back as
    /// `WalRecord::Corrupt`.
    pub fn next_record(&mut self) -> Result<Option<WalRecord>> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            self.finished = true;
            return Ok(None);
        }

        if buf.last() != Some(&b'\n') {
            self.finished = true;
            return Ok(Some(WalRecord::Torn {
                valid_len: self.offset,
            }));
        }

        self.line += 1;
        self.offset += read as u64;

        let record = match WalEntry::deserialize(&buf) {
            Ok(entry) => WalRecord::Valid(entry),
            Err(e) => WalRecord::Corrupt {
                line: self.line,
                reason: e.to_string(),
            },
        };
        Ok(Some(record))
    }

    /// Byte offset just past the last complete line read
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Iterate over all records
    pub fn records(self) -> WalIterator {
        WalIterator { reader: self }
    }
}

/// Iterator over WAL records
pub struct WalIterator {
    reader: WalReader,
}

impl Iterator for WalIterator {
    type Item = Result<WalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.reader.finished = true;
                Some(Err(e))
            }
        }
    }
}
