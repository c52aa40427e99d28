//! Table Module
//!
//! In-memory, authoritative cache of current state, rebuilt from the WAL.
//!
//! ## Data Structure Choice
//! ```text
//! TableRegistry: name -> Arc<Table>
//! Table (sorted):   partition key -> BTreeMap<sort key, Item>
//! Table (no sort):  partition key -> Item
//! ```
//! BTreeMap gives ordered range scans over sort keys; each table sits
//! behind its own RwLock so tables never contend with each other.

mod table;
mod registry;

pub use table::{KeySchema, Table};
pub use registry::TableRegistry;
