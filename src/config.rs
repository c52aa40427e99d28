//! Configuration for StrataKV
//!
//! Everything an engine or server needs to know before it starts.

use std::path::{Path, PathBuf};

use crate::error::{Result, StrataError};

/// Settings for one StrataKV instance
///
/// On-disk layout under `data_dir`:
/// ```text
/// {data_dir}/
///   └── wal.log
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the write-ahead log; created on open
    pub data_dir: PathBuf,

    /// How far each WAL append is pushed before it returns
    pub wal_sync_strategy: WalSyncStrategy,

    /// `host:port` the HTTP server binds
    pub listen_addr: String,
}

/// Durability of a single WAL append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// `sync_data` after every record. Survives power loss.
    EveryWrite,

    /// Hand each record to the OS without fsync. Survives a process crash,
    /// not a power loss.
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./stratakv_data"),
            wal_sync_strategy: WalSyncStrategy::EveryWrite,
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Defaults with `data_dir` replaced
    pub fn for_dir(path: &Path) -> Self {
        Self::builder().data_dir(path).build()
    }

    /// Location of the write-ahead log inside `data_dir`
    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join(crate::wal::WAL_FILENAME)
    }

    /// Reject settings no engine can start with
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(StrataError::Config("data_dir must not be empty".to_string()));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(StrataError::Config("listen_addr must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Consuming builder over [`Config::default`]
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
