//! Stored item

use serde::{Deserialize, Serialize};

use super::{AttributeValue, Attributes, Key};

/// A stored record: its derived primary key and the attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub primary_key: Key,
    pub attributes: Attributes,
}

impl Item {
    pub fn new(primary_key: Key, attributes: Attributes) -> Self {
        Self {
            primary_key,
            attributes,
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }
}
