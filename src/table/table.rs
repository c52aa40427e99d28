//! Table implementation
//!
//! Partitioned item store with an RwLock per table.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};
use crate::model::{Attributes, Item, Key};

/// Name and key-attribute names of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySchema {
    pub table_name: String,
    pub partition_key_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key_name: Option<String>,
}

impl KeySchema {
    pub fn new(
        table_name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: Option<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key_name: partition_key_name.into(),
            sort_key_name,
        }
    }

    pub fn has_sort_key(&self) -> bool {
        self.sort_key_name.is_some()
    }

    /// Derive the primary key from an item's attributes
    pub fn derive_key(&self, attributes: &Attributes) -> Result<Key> {
        let partition_key = self.key_value(attributes, &self.partition_key_name)?;
        let sort_key = match &self.sort_key_name {
            Some(name) => Some(self.key_value(attributes, name)?),
            None => None,
        };
        Ok(Key::new(partition_key, sort_key))
    }

    fn key_value(&self, attributes: &Attributes, name: &str) -> Result<String> {
        attributes
            .get(name)
            .and_then(|v| v.as_key_string())
            .ok_or_else(|| self.missing(name))
    }

    fn missing(&self, attribute: &str) -> StrataError {
        StrataError::MissingKeyAttribute {
            table: self.table_name.clone(),
            attribute: attribute.to_string(),
        }
    }
}

/// Partition storage
///
/// Tables without a sort key hold one item per partition key, so no inner
/// ordering is kept for them.
#[derive(Debug)]
enum Partitions {
    Single(HashMap<String, Item>),
    Sorted(HashMap<String, BTreeMap<String, Item>>),
}

/// In-memory store for one table's items
///
/// ## Invariants
/// - Every stored item's key equals the key derived from its attributes
///   under this table's schema.
/// - No partition is ever empty: the last removal prunes it.
#[derive(Debug)]
pub struct Table {
    schema: KeySchema,
    partitions: RwLock<Partitions>,
}

impl Table {
    /// Create an empty table
    pub fn new(schema: KeySchema) -> Self {
        let partitions = if schema.has_sort_key() {
            Partitions::Sorted(HashMap::new())
        } else {
            Partitions::Single(HashMap::new())
        };

        Self {
            schema,
            partitions: RwLock::new(partitions),
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.table_name
    }

    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    /// Build an item from raw attributes, deriving its primary key.
    ///
    /// Does not store anything.
    pub fn build_item(&self, attributes: Attributes) -> Result<Item> {
        let key = self.schema.derive_key(&attributes)?;
        Ok(Item::new(key, attributes))
    }

    /// Derive the key and store the item (last write wins)
    pub fn put(&self, attributes: Attributes) -> Result<Item> {
        let item = self.build_item(attributes)?;
        self.insert(item.clone())?;
        Ok(item)
    }

    /// Store an already-built item, returning the one it replaced.
    ///
    /// The item's key is re-derived from its attributes so a stale or
    /// foreign key can never be stored.
    pub fn insert(&self, mut item: Item) -> Result<Option<Item>> {
        let key = self.schema.derive_key(&item.attributes)?;
        item.primary_key = key.clone();

        let mut partitions = self.partitions.write();
        let previous = match &mut *partitions {
            Partitions::Single(map) => map.insert(key.partition_key, item),
            Partitions::Sorted(map) => {
                // derive_key always yields a sort key for sorted schemas
                let sort_key = key.sort_key.unwrap_or_default();
                map.entry(key.partition_key)
                    .or_default()
                    .insert(sort_key, item)
            }
        };
        Ok(previous)
    }

    /// Look up an item. Unknown keys are `None`, never an error.
    pub fn get(&self, partition_key: &str, sort_key: Option<&str>) -> Option<Item> {
        let partitions = self.partitions.read();
        match &*partitions {
            Partitions::Single(map) => map.get(partition_key).cloned(),
            Partitions::Sorted(map) => {
                let sort_key = sort_key?;
                map.get(partition_key)?.get(sort_key).cloned()
            }
        }
    }

    pub fn contains(&self, partition_key: &str, sort_key: Option<&str>) -> bool {
        let partitions = self.partitions.read();
        match &*partitions {
            Partitions::Single(map) => map.contains_key(partition_key),
            Partitions::Sorted(map) => match sort_key {
                Some(sk) => map
                    .get(partition_key)
                    .map(|p| p.contains_key(sk))
                    .unwrap_or(false),
                None => false,
            },
        }
    }

    /// Remove an item, pruning its partition if it becomes empty.
    ///
    /// Removing an absent item is a no-op returning `None`.
    pub fn remove(&self, partition_key: &str, sort_key: Option<&str>) -> Option<Item> {
        let mut partitions = self.partitions.write();
        match &mut *partitions {
            Partitions::Single(map) => map.remove(partition_key),
            Partitions::Sorted(map) => {
                let sort_key = sort_key?;
                let partition = map.get_mut(partition_key)?;
                let removed = partition.remove(sort_key);
                if partition.is_empty() {
                    map.remove(partition_key);
                }
                removed
            }
        }
    }

    /// Items of one partition whose sort key lies in `[start, end]`,
    /// ascending. Either bound may be open.
    ///
    /// Tables without a sort key ignore the bounds and return the single
    /// item for the partition key, if any.
    pub fn query(
        &self,
        partition_key: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Vec<Item> {
        let partitions = self.partitions.read();
        match &*partitions {
            Partitions::Single(map) => map.get(partition_key).cloned().into_iter().collect(),
            Partitions::Sorted(map) => {
                let Some(partition) = map.get(partition_key) else {
                    return Vec::new();
                };

                if let (Some(s), Some(e)) = (start, end) {
                    // BTreeMap::range panics on inverted bounds
                    if s > e {
                        return Vec::new();
                    }
                }

                let lower = start.map_or(Bound::Unbounded, Bound::Included);
                let upper = end.map_or(Bound::Unbounded, Bound::Included);
                partition
                    .range::<str, _>((lower, upper))
                    .map(|(_, item)| item.clone())
                    .collect()
            }
        }
    }

    /// Number of live partitions
    pub fn partition_count(&self) -> usize {
        match &*self.partitions.read() {
            Partitions::Single(map) => map.len(),
            Partitions::Sorted(map) => map.len(),
        }
    }

    /// Whether a partition key currently has an entry in the partition map
    pub fn has_partition(&self, partition_key: &str) -> bool {
        match &*self.partitions.read() {
            Partitions::Single(map) => map.contains_key(partition_key),
            Partitions::Sorted(map) => map.contains_key(partition_key),
        }
    }

    /// Total number of items
    pub fn item_count(&self) -> usize {
        match &*self.partitions.read() {
            Partitions::Single(map) => map.len(),
            Partitions::Sorted(map) => map.values().map(BTreeMap::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partition_count() == 0
    }

    /// Snapshot of every item, ordered by primary key
    pub fn items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = match &*self.partitions.read() {
            Partitions::Single(map) => map.values().cloned().collect(),
            Partitions::Sorted(map) => map
                .values()
                .flat_map(|p| p.values().cloned())
                .collect(),
        };
        items.sort_by(|a, b| a.primary_key.cmp(&b.primary_key));
        items
    }
}
