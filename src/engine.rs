//! Engine Module
//!
//! The storage engine that sequences the WAL and the table registry.
//!
//! ## Responsibilities
//! - Validate, log, then apply every mutation
//! - Serve reads straight from the tables
//! - Rebuild all tables from the WAL before accepting requests

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, StrataError};
use crate::model::{Attributes, Item, Key};
use crate::protocol::{Command, CommandOutput};
use crate::table::{KeySchema, Table, TableRegistry};
use crate::wal::{Operation, RecoveryResult, WalEntry, WalRecovery, WalWriter};

/// The main storage engine
///
/// ## Write path
/// `validate → WAL append → apply → return`, all under the WAL lock.
/// Holding that lock through the apply step makes the log order the
/// apply order, so a replay reproduces exactly what readers saw. A
/// failed append returns before anything touches memory.
///
/// ## Read path
/// Registry and table read locks only; reads never wait on the WAL.
pub struct Engine {
    config: Config,

    /// Serializes every mutation, see the write path above
    wal: Mutex<WalWriter>,

    /// Copy of the writer's next LSN, readable without the WAL lock
    next_lsn: AtomicU64,

    /// All tables (internal locking)
    registry: Arc<TableRegistry>,

    /// What startup recovery found
    recovery: RecoveryResult,
}

/// Counts from applying a sequence of WAL entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub tables_created: u64,
    pub items_put: u64,
    pub items_deleted: u64,
}

impl ReplayStats {
    pub fn total(&self) -> u64 {
        self.tables_created + self.items_put + self.items_deleted
    }
}

impl Engine {
    /// Open or create an engine over `config.data_dir`
    ///
    /// Startup sequence:
    /// 1. Create the data directory
    /// 2. Recover the WAL (skip corrupt records, cut a torn tail)
    /// 3. Replay every entry into a fresh registry
    /// 4. Reopen the WAL for appends, continuing the LSN sequence
    ///
    /// The engine is only handed out once replay has finished.
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_registry(config, Arc::new(TableRegistry::new()))
    }

    /// Open with a caller-supplied registry
    ///
    /// The registry should be empty; replay applies on top of whatever it
    /// already holds.
    pub fn open_with_registry(config: Config, registry: Arc<TableRegistry>) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;
        let wal_path = config.wal_path();

        let (entries, recovery) = WalRecovery::recover(&wal_path)?;
        let stats = replay_into(&registry, &entries)?;

        tracing::info!(
            "WAL recovery: {} entries recovered, {} corrupted, last_lsn={}, truncated={}",
            recovery.entries_recovered,
            recovery.entries_corrupted,
            recovery.last_lsn,
            recovery.was_truncated
        );
        tracing::info!(
            "replayed {} tables, {} puts, {} deletes from {:?}",
            stats.tables_created,
            stats.items_put,
            stats.items_deleted,
            wal_path
        );

        let wal = WalWriter::open_at(&wal_path, config.wal_sync_strategy, recovery.last_lsn + 1)?;

        Ok(Self {
            config,
            next_lsn: AtomicU64::new(wal.current_lsn()),
            wal: Mutex::new(wal),
            registry,
            recovery,
        })
    }

    /// Open `path` with every other setting at its default
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::for_dir(path))
    }

    /// Run one API command against this engine
    pub fn execute(&self, command: Command) -> Result<CommandOutput> {
        match command {
            Command::CreateTable {
                table_name,
                partition_key_name,
                sort_key_name,
            } => {
                self.create_table(&table_name, &partition_key_name, sort_key_name.as_deref())?;
                Ok(CommandOutput::Done)
            }
            Command::PutItem {
                table_name,
                attributes,
            } => {
                let item = self.put_item(&table_name, attributes)?;
                Ok(CommandOutput::Item(Some(item)))
            }
            Command::GetItem {
                table_name,
                partition_key,
                sort_key,
            } => {
                let item = self.get_item(&table_name, &partition_key, sort_key.as_deref())?;
                Ok(CommandOutput::Item(item))
            }
            Command::DeleteItem {
                table_name,
                partition_key,
                sort_key,
            } => {
                self.delete_item(&table_name, &partition_key, sort_key.as_deref())?;
                Ok(CommandOutput::Done)
            }
            Command::Query {
                table_name,
                partition_key,
                start_key,
                end_key,
            } => {
                let items = self.query(
                    &table_name,
                    &partition_key,
                    start_key.as_deref(),
                    end_key.as_deref(),
                )?;
                Ok(CommandOutput::Items(items))
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a table. Creating an existing name is a no-op and is not
    /// logged.
    pub fn create_table(
        &self,
        table_name: &str,
        partition_key_name: &str,
        sort_key_name: Option<&str>,
    ) -> Result<()> {
        let mut wal = self.wal.lock();

        if self.registry.contains(table_name) {
            tracing::debug!("table '{}' already exists", table_name);
            return Ok(());
        }

        let operation = Operation::CreateTable {
            table_name: table_name.to_string(),
            partition_key_name: partition_key_name.to_string(),
            sort_key_name: sort_key_name.map(str::to_string),
        };
        let lsn = wal.append(operation)?;
        self.next_lsn.store(lsn + 1, Ordering::Release);

        self.registry.create_table(KeySchema::new(
            table_name,
            partition_key_name,
            sort_key_name.map(str::to_string),
        ));

        tracing::info!(lsn, "table '{}' created", table_name);
        Ok(())
    }

    /// Put an item, deriving its key from the table schema
    pub fn put_item(&self, table_name: &str, attributes: Attributes) -> Result<Item> {
        let mut wal = self.wal.lock();

        let table = self.registry.get_table(table_name)?;
        let item = table.build_item(attributes)?;

        let lsn = wal.append(Operation::PutItem {
            table_name: table_name.to_string(),
            item: item.clone(),
        })?;
        self.next_lsn.store(lsn + 1, Ordering::Release);
        table.insert(item.clone())?;

        tracing::debug!(lsn, "put {}:{}", table_name, item.primary_key);
        Ok(item)
    }

    /// Delete an item. Deleting an absent item is a no-op and is not
    /// logged.
    pub fn delete_item(
        &self,
        table_name: &str,
        partition_key: &str,
        sort_key: Option<&str>,
    ) -> Result<()> {
        let mut wal = self.wal.lock();

        let table = self.registry.get_table(table_name)?;
        if !table.contains(partition_key, sort_key) {
            return Ok(());
        }

        // Normalize to the schema: tables without a sort key ignore one
        let key = Key::new(
            partition_key,
            sort_key
                .filter(|_| table.schema().has_sort_key())
                .map(str::to_string),
        );
        let lsn = wal.append(Operation::DeleteItem {
            table_name: table_name.to_string(),
            key: key.clone(),
        })?;
        self.next_lsn.store(lsn + 1, Ordering::Release);
        table.remove(&key.partition_key, key.sort_key());

        tracing::debug!(lsn, "delete {}:{}", table_name, key);
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get an item by key
    pub fn get_item(
        &self,
        table_name: &str,
        partition_key: &str,
        sort_key: Option<&str>,
    ) -> Result<Option<Item>> {
        let table = self.registry.get_table(table_name)?;
        Ok(table.get(partition_key, sort_key))
    }

    /// Range query over one partition's sort keys, inclusive on both ends
    pub fn query(
        &self,
        table_name: &str,
        partition_key: &str,
        start_key: Option<&str>,
        end_key: Option<&str>,
    ) -> Result<Vec<Item>> {
        let table = self.registry.get_table(table_name)?;
        Ok(table.query(partition_key, start_key, end_key))
    }

    /// Force a full sync of the WAL
    pub fn sync(&self) -> Result<()> {
        self.wal.lock().sync()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the WAL file path
    pub fn wal_path(&self) -> PathBuf {
        self.config.wal_path()
    }

    /// Get the table registry
    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    /// Table names in ascending order
    pub fn table_names(&self) -> Vec<String> {
        self.registry.table_names()
    }

    /// Get what startup recovery found
    pub fn recovery_result(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// LSN the next mutation will be logged under. Never waits on a write
    /// in progress.
    pub fn next_lsn(&self) -> u64 {
        self.next_lsn.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Apply WAL entries to a registry without logging them again.
///
/// Entries are applied in the order given. A put or delete against a table
/// no earlier entry created is a `ReplayInconsistency`, as is a put whose
/// attributes no longer yield a key under the table's schema.
pub fn replay_into(registry: &TableRegistry, entries: &[WalEntry]) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for entry in entries {
        match &entry.operation {
            Operation::CreateTable {
                table_name,
                partition_key_name,
                sort_key_name,
            } => {
                let created = registry.create_table(KeySchema::new(
                    table_name.clone(),
                    partition_key_name.clone(),
                    sort_key_name.clone(),
                ));
                if created {
                    stats.tables_created += 1;
                }
            }
            Operation::PutItem { table_name, item } => {
                let table = replay_table(registry, entry.lsn, table_name)?;
                table
                    .insert(item.clone())
                    .map_err(|e| StrataError::ReplayInconsistency {
                        lsn: entry.lsn,
                        reason: e.to_string(),
                    })?;
                stats.items_put += 1;
            }
            Operation::DeleteItem { table_name, key } => {
                let table = replay_table(registry, entry.lsn, table_name)?;
                table.remove(&key.partition_key, key.sort_key());
                stats.items_deleted += 1;
            }
        }
    }

    Ok(stats)
}

fn replay_table(
    registry: &TableRegistry,
    lsn: u64,
    table_name: &str,
) -> Result<Arc<Table>> {
    registry
        .get_table(table_name)
        .map_err(|_| StrataError::ReplayInconsistency {
            lsn,
            reason: format!("table '{}' was never created", table_name),
        })
}
