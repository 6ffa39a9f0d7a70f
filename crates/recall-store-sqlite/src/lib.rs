//! SQLite backend for the Recall expense tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Implements both
//! [`recall_core::store::ReferenceStore`] and
//! [`recall_core::store::RecordStore`] on a single connection.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
