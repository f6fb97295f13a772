//! SQLite backend for the `mdfill` backfill runner.
//!
//! Wraps [`tokio_rusqlite`] so the connection lives on its own thread and the
//! runner can await each statement in turn.

mod sql;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
