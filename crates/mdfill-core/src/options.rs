//! Run parameters for a backfill.

use crate::{Error, Result, ident::validate_ident};

pub const DEFAULT_PATH_COLUMN:    &str = "path";
pub const DEFAULT_CONTENT_COLUMN: &str = "md_content";
pub const DEFAULT_ID_COLUMN:      &str = "id";
pub const DEFAULT_ENCODING:       &str = "utf-8";
pub const DEFAULT_BATCH_SIZE:     u64 = 500;

/// Everything a backfill run needs apart from the database location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillOptions {
  pub table:              String,
  /// Column holding a filesystem path per row.
  pub path_column:        String,
  /// Column receiving the decoded file text; added if absent.
  pub content_column:     String,
  pub id_column:          String,
  /// WHATWG encoding label used to decode file contents.
  pub encoding:           String,
  /// Successful writes between intermediate commits.
  pub batch_size:         u64,
  /// Translate `\r\n` and lone `\r` to `\n` after decoding, as a
  /// text-mode read would.
  pub normalize_newlines: bool,
  /// Use WAL journaling and `synchronous = NORMAL` for the run.
  pub fast_pragmas:       bool,
}

impl BackfillOptions {
  /// Options for `table` with every other field at its default.
  pub fn new(table: impl Into<String>) -> Self {
    Self {
      table:              table.into(),
      path_column:        DEFAULT_PATH_COLUMN.to_owned(),
      content_column:     DEFAULT_CONTENT_COLUMN.to_owned(),
      id_column:          DEFAULT_ID_COLUMN.to_owned(),
      encoding:           DEFAULT_ENCODING.to_owned(),
      batch_size:         DEFAULT_BATCH_SIZE,
      normalize_newlines: true,
      fast_pragmas:       true,
    }
  }

  /// Check identifiers and batch size. Encoding labels are checked when the
  /// decoder is built.
  pub fn validate(&self) -> Result<()> {
    for ident in [
      &self.table,
      &self.path_column,
      &self.content_column,
      &self.id_column,
    ] {
      validate_ident(ident)?;
    }
    if self.batch_size == 0 {
      return Err(Error::InvalidBatchSize);
    }
    Ok(())
  }
}
