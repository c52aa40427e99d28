//! # StrataKV
//!
//! A single-node table store with:
//! - Named tables keyed by partition key plus optional sort key
//! - Write-Ahead Logging (WAL) for durability
//! - Crash recovery by WAL replay
//! - Ordered range queries over sort keys
//! - HTTP API
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │                  (axum, many tasks)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │        validate → WAL append → apply   |   reads             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │     WAL     │          │ TableRegistry │
//!   │  (Append)   │          │  (RwLock per  │
//!   └─────────────┘          │    table)     │
//!                            └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod wal;
pub mod table;
pub mod engine;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StrataError, Result};
pub use config::Config;
pub use engine::Engine;
pub use model::{AttributeValue, Attributes, Item, Key};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of StrataKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
