//! Error type for `mdfill-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] mdfill_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// `PRAGMA table_info` returned no columns.
  #[error("table not found: {0:?}")]
  TableNotFound(String),

  #[error("column {column:?} not found on table {table:?}")]
  ColumnNotFound { table: String, column: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
