//! Network Module
//!
//! HTTP front end over a shared engine.
//!
//! ## Architecture
//! - axum router on a multi-threaded tokio runtime
//! - Reads run inline on the request task
//! - Mutations run on the blocking pool, since the WAL sync blocks
//! - Commands routed through Engine

mod server;
mod routes;

pub use server::Server;
pub use routes::router;
