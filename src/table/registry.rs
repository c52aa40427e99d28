//! Table Registry
//!
//! Owns every table by name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, StrataError};

use super::{KeySchema, Table};

/// Name → table mapping shared by the engine and recovery
///
/// ## Concurrency:
/// - `tables`: RwLock over the name map (lookups share, registration is
///   exclusive). Each table then carries its own lock, so item traffic on
///   one table never blocks another.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table. Returns `false` (and changes nothing) if the name
    /// is already taken, whatever schema the existing table has.
    pub fn create_table(&self, schema: KeySchema) -> bool {
        let mut tables = self.tables.write();
        if tables.contains_key(&schema.table_name) {
            return false;
        }
        let name = schema.table_name.clone();
        tables.insert(name, Arc::new(Table::new(schema)));
        true
    }

    /// Look up a table by name
    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StrataError::TableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Table names in ascending order
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}
