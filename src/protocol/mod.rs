//! Protocol Module
//!
//! Request and response shapes of the HTTP API, and the mapping from
//! engine errors to status codes.
//!
//! ### Commands
//! - CreateTable - body: `{tableName, partitionKeyName, sortKeyName?}`
//! - PutItem     - body: attribute object
//! - GetItem     - path: table, partition key, optional sort key
//! - DeleteItem  - path: table, partition key, optional sort key
//! - Query       - query string: `partitionKey`, `startKey?`, `endKey?`
//!
//! ### Status Codes
//! - 404: unknown table, or GetItem found nothing
//! - 400: item lacks a key attribute
//! - 500: WAL or other server-side failure

mod command;
mod response;

pub use command::{Command, CommandOutput, CreateTableRequest, QueryParams};
pub use response::{status_for, ApiError, ErrorResponse, HealthResponse};
