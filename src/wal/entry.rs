//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries and their
//! line encoding.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};
use crate::model::{Item, Key};

/// Separator between the checksum and the JSON payload
const CRC_SEPARATOR: char = ' ';

/// Width of the hex checksum prefix
pub const CRC_HEX_LEN: usize = 8;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,

    /// The operation to perform
    pub operation: Operation,
}

/// Mutations that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Register a table and its key schema
    CreateTable {
        table_name: String,
        partition_key_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sort_key_name: Option<String>,
    },

    /// Insert or overwrite an item
    PutItem { table_name: String, item: Item },

    /// Remove an item by key
    DeleteItem { table_name: String, key: Key },
}

impl Operation {
    /// Name of the table this operation targets
    pub fn table_name(&self) -> &str {
        match self {
            Operation::CreateTable { table_name, .. }
            | Operation::PutItem { table_name, .. }
            | Operation::DeleteItem { table_name, .. } => table_name,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CreateTable { .. } => "create_table",
            Operation::PutItem { .. } => "put_item",
            Operation::DeleteItem { .. } => "delete_item",
        }
    }
}

impl WalEntry {
    /// Create an entry stamped with the current wall-clock time
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            lsn,
            timestamp,
            operation,
        }
    }

    /// Encode as one log line: `<crc32 hex> <json>\n`
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = serde_json::to_string(self)?;
        let crc = compute_crc(payload.as_bytes());

        let mut line = Vec::with_capacity(CRC_HEX_LEN + 2 + payload.len());
        line.extend_from_slice(format!("{:08x}{}", crc, CRC_SEPARATOR).as_bytes());
        line.extend_from_slice(payload.as_bytes());
        line.push(b'\n');
        Ok(line)
    }

    /// Decode one log line (with or without its trailing newline).
    ///
    /// Any framing, checksum, or JSON problem is `WalCorruption`.
    pub fn deserialize(line: &[u8]) -> Result<Self> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let text = std::str::from_utf8(line)
            .map_err(|e| StrataError::WalCorruption(format!("invalid UTF-8: {}", e)))?;

        let (crc_hex, payload) = text
            .split_once(CRC_SEPARATOR)
            .ok_or_else(|| StrataError::WalCorruption("missing checksum separator".to_string()))?;

        if crc_hex.len() != CRC_HEX_LEN {
            return Err(StrataError::WalCorruption(format!(
                "checksum field has {} chars, expected {}",
                crc_hex.len(),
                CRC_HEX_LEN
            )));
        }

        let expected = u32::from_str_radix(crc_hex, 16)
            .map_err(|e| StrataError::WalCorruption(format!("bad checksum field: {}", e)))?;
        let actual = compute_crc(payload.as_bytes());
        if expected != actual {
            return Err(StrataError::WalCorruption(format!(
                "CRC mismatch: expected {:#010x}, got {:#010x}",
                expected, actual
            )));
        }

        serde_json::from_str(payload)
            .map_err(|e| StrataError::WalCorruption(format!("undecodable entry: {}", e)))
    }
}

/// CRC32 of a record payload
pub fn compute_crc(payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    hasher.finalize()
}
