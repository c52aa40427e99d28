//! Composite primary key

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of an item: partition key plus optional sort key.
///
/// Ordering is lexicographic on the partition key, then the sort key
/// (absent sorts first).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub partition_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl Key {
    pub fn new(partition_key: impl Into<String>, sort_key: Option<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key,
        }
    }

    /// Key for a table without a sort key
    pub fn partition(partition_key: impl Into<String>) -> Self {
        Self::new(partition_key, None)
    }

    /// Key for a table with a sort key
    pub fn sorted(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self::new(partition_key, Some(sort_key.into()))
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sort_key {
            Some(sk) => write!(f, "{}/{}", self.partition_key, sk),
            None => f.write_str(&self.partition_key),
        }
    }
}
