//! Command definitions
//!
//! Engine operations as values, plus the HTTP bodies that carry them.

use serde::{Deserialize, Serialize};

use crate::model::{Attributes, Item};

/// Body of a create-table request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    pub table_name: String,
    pub partition_key_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key_name: Option<String>,
}

/// Query-string parameters of a range query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub partition_key: String,
    #[serde(default)]
    pub start_key: Option<String>,
    #[serde(default)]
    pub end_key: Option<String>,
}

/// A parsed command
#[derive(Debug, Clone)]
pub enum Command {
    CreateTable {
        table_name: String,
        partition_key_name: String,
        sort_key_name: Option<String>,
    },

    PutItem {
        table_name: String,
        attributes: Attributes,
    },

    GetItem {
        table_name: String,
        partition_key: String,
        sort_key: Option<String>,
    },

    DeleteItem {
        table_name: String,
        partition_key: String,
        sort_key: Option<String>,
    },

    Query {
        table_name: String,
        partition_key: String,
        start_key: Option<String>,
        end_key: Option<String>,
    },
}

impl Command {
    /// Whether executing this command appends to the WAL
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::CreateTable { .. } | Command::PutItem { .. } | Command::DeleteItem { .. }
        )
    }

    pub fn table_name(&self) -> &str {
        match self {
            Command::CreateTable { table_name, .. }
            | Command::PutItem { table_name, .. }
            | Command::GetItem { table_name, .. }
            | Command::DeleteItem { table_name, .. }
            | Command::Query { table_name, .. } => table_name,
        }
    }
}

impl From<CreateTableRequest> for Command {
    fn from(req: CreateTableRequest) -> Self {
        Command::CreateTable {
            table_name: req.table_name,
            partition_key_name: req.partition_key_name,
            sort_key_name: req.sort_key_name,
        }
    }
}

/// What a command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Nothing to return (create, delete)
    Done,

    /// The stored item (put) or the looked-up item (get)
    Item(Option<Item>),

    /// Query results in ascending sort-key order
    Items(Vec<Item>),
}
